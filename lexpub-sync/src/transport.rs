//! The remote repository seam.
//!
//! [`Transport`] is everything the reconciliation engine needs from the
//! network: authenticate, list one page of records, apply one write batch.
//! Retries and timeouts, if any, live behind this trait.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use lexpub_core::PublishedRecord;

use crate::error::TransportError;

/// Collection that holds published lexicon schemas.
pub const LEXICON_COLLECTION: &str = "com.atproto.lexicon.schema";

/// Records requested per `listRecords` page.
pub const PAGE_SIZE: u32 = 100;

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Repository identity (`did:plc:…`) all reads and writes are scoped to.
    pub did: String,
    pub handle: String,
}

/// Query for `com.atproto.repo.listRecords`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRecordsParams {
    pub repo: String,
    pub collection: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// One page of `com.atproto.repo.listRecords`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListRecordsOutput {
    #[serde(default)]
    pub cursor: Option<String>,
    pub records: Vec<PublishedRecord>,
}

/// A single operation inside an `applyWrites` batch.
///
/// Only `create` is needed: creating at an explicit record key overwrites
/// whatever is stored there.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "$type")]
pub enum WriteOp {
    #[serde(rename = "com.atproto.repo.applyWrites#create")]
    Create {
        collection: String,
        rkey: String,
        value: Value,
    },
}

impl WriteOp {
    pub fn rkey(&self) -> &str {
        match self {
            WriteOp::Create { rkey, .. } => rkey,
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            WriteOp::Create { value, .. } => value,
        }
    }
}

/// Body of `com.atproto.repo.applyWrites`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyWritesInput {
    pub repo: String,
    pub validate: bool,
    pub writes: Vec<WriteOp>,
}

/// Authenticated access to a remote record repository.
pub trait Transport {
    /// Create a session. Every later call acts as this identity.
    fn login(&mut self, identifier: &str, password: &str) -> Result<Session, TransportError>;

    /// Fetch one page of records.
    fn list_records(
        &mut self,
        params: &ListRecordsParams,
    ) -> Result<ListRecordsOutput, TransportError>;

    /// Apply every write in `input` atomically, or none of them.
    fn apply_writes(&mut self, input: &ApplyWritesInput) -> Result<(), TransportError>;
}
