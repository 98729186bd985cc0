//! # lexpub-sync
//!
//! Reconciles local lexicon documents against a remote repository and
//! publishes the difference as one atomic write batch.
//!
//! Call [`pipeline::run`] for a full run, or [`pipeline::plan`] to stop after
//! reconciliation. The remote side is reached only through [`Transport`];
//! the job runner only through [`JobSurface`].

pub mod config;
pub mod diff;
pub mod error;
pub mod inventory;
pub mod pipeline;
pub mod reconcile;
pub mod surface;
pub mod tid;
pub mod transport;
pub mod writer;

pub use config::RunConfig;
pub use error::{SyncError, TransportError};
pub use pipeline::{Plan, RunMode, RunOutcome};
pub use surface::JobSurface;
pub use transport::{Session, Transport};
pub use writer::{PublishOutcome, PublishStats};
