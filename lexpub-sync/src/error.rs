//! Error types for lexpub-sync.

use thiserror::Error;

use lexpub_core::LoadError;

/// Failure reported by the transport collaborator.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Structured error returned by the remote XRPC endpoint.
    #[error("[{status}] {error}: {message}")]
    Xrpc {
        status: u16,
        error: String,
        message: String,
    },

    /// Connection, TLS, or timeout failure.
    #[error("{0}")]
    Network(String),

    /// The response body was not what the endpoint promises.
    #[error("{0}")]
    Decode(String),

    /// A repository call was made before `login`.
    #[error("not authenticated; call login first")]
    NotAuthenticated,
}

/// All errors that can end a run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A required input is missing or blank. The message is user-facing.
    #[error("{0}")]
    InvalidInput(String),

    /// Local lexicons could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Login or listing failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The write batch was rejected; nothing was applied.
    #[error("Failed to publish {count} lexicons: {source}")]
    Publish {
        count: usize,
        #[source]
        source: TransportError,
    },

    /// The job runner refused an output value.
    #[error("failed to set output {name}: {source}")]
    Output {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Encoding an output value failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
