//! Local lexicon discovery.
//!
//! [`load_lexicons`] walks a list of files and directories depth-first and
//! parses every `*.json` file it finds into the reconciliation dictionary.
//!
//! Every input is resolved to its canonical absolute path before anything
//! else happens. A path that was already processed in the same load is
//! skipped, so overlapping inputs (`lexicons/` and `lexicons/app/`) and
//! symlink loops each cost one visit per file.

use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::error::LoadError;
use crate::types::{LexiconDictionary, LexiconEntry, LocalLexicon};

/// A path to load, optionally with file metadata the caller already has.
#[derive(Debug, Clone)]
pub struct PathDetails {
    pub path: PathBuf,
    pub metadata: Option<Metadata>,
}

impl PathDetails {
    pub fn with_metadata(path: impl Into<PathBuf>, metadata: Metadata) -> Self {
        Self {
            path: path.into(),
            metadata: Some(metadata),
        }
    }
}

impl From<PathBuf> for PathDetails {
    fn from(path: PathBuf) -> Self {
        Self {
            path,
            metadata: None,
        }
    }
}

impl From<&Path> for PathDetails {
    fn from(path: &Path) -> Self {
        path.to_path_buf().into()
    }
}

impl From<String> for PathDetails {
    fn from(path: String) -> Self {
        PathBuf::from(path).into()
    }
}

impl From<&str> for PathDetails {
    fn from(path: &str) -> Self {
        PathBuf::from(path).into()
    }
}

/// Load every lexicon reachable from `paths`.
///
/// Non-JSON files are ignored. Any unreadable path, invalid JSON file, or
/// document without an `id` aborts the whole load. When two files declare
/// the same id, the one discovered last wins.
///
/// An empty input yields an empty dictionary; deciding whether that is
/// acceptable is up to the caller.
pub fn load_lexicons<I, P>(paths: I) -> Result<LexiconDictionary, LoadError>
where
    I: IntoIterator<Item = P>,
    P: Into<PathDetails>,
{
    let mut dictionary = LexiconDictionary::new();
    let mut visited = HashSet::new();

    // Worklist is a stack: reverse so the first input is processed first.
    let mut pending: Vec<PathDetails> = paths.into_iter().map(Into::into).collect();
    pending.reverse();

    while let Some(item) = pending.pop() {
        let path = fs::canonicalize(&item.path).map_err(|source| LoadError::Access {
            path: absolute_or_given(&item.path),
            source,
        })?;

        if !visited.insert(path.clone()) {
            continue;
        }

        let metadata = match item.metadata {
            Some(metadata) => metadata,
            None => fs::metadata(&path).map_err(|source| LoadError::Access {
                path: path.clone(),
                source,
            })?,
        };

        if metadata.is_dir() {
            // Descendants are expanded in place so this directory finishes
            // before the next sibling input starts.
            let descendants = list_descendants(&path)?;
            pending.extend(descendants.into_iter().rev());
            continue;
        }

        // The name as given decides, so a `foo.json` symlink to an oddly
        // named target still loads.
        if !item.path.to_string_lossy().ends_with(".json") {
            continue;
        }

        let local = read_lexicon(&path)?;
        tracing::info!("Loaded file: {}", local.id);
        dictionary.insert(local.id.clone(), LexiconEntry::new(local));
    }

    Ok(dictionary)
}

/// Immediate children of `dir`, sorted by name.
///
/// Subdirectories are expanded later by the worklist. Symlinks are reported
/// without metadata so the caller stats (and canonicalizes) their targets.
fn list_descendants(dir: &Path) -> Result<Vec<PathDetails>, LoadError> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let metadata = if entry.path_is_symlink() {
            None
        } else {
            entry.metadata().ok()
        };
        out.push(PathDetails {
            path: entry.into_path(),
            metadata,
        });
    }
    Ok(out)
}

fn read_lexicon(path: &Path) -> Result<LocalLexicon, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    LocalLexicon::from_document(document).ok_or_else(|| LoadError::MissingId {
        path: path.to_path_buf(),
    })
}

fn absolute_or_given(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
