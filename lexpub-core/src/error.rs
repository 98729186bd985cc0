//! Error types for lexpub-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading local lexicon documents.
///
/// Every variant is fatal for the whole run; no partial dictionary is used.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path could not be resolved or stat'ed (usually: it does not exist).
    #[error("Failed to access path \"{}\": {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed part-way through.
    #[error("Failed to read directory \"{}\": {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The file exists but its contents could not be read as text.
    #[error("Failed to read lexicon file \"{}\": {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("Failed to parse \"{}\" as valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but carries no usable `id`.
    #[error("Lexicon file \"{}\" is missing required \"id\" field", path.display())]
    MissingId { path: PathBuf },
}

impl LoadError {
    /// Path of the file or directory that caused the failure.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Access { path, .. }
            | LoadError::Walk { path, .. }
            | LoadError::Read { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::MissingId { path } => path,
        }
    }
}
