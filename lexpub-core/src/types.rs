//! Domain types for lexicon reconciliation.
//!
//! A [`LexiconDictionary`] holds one [`LexiconEntry`] per lexicon id. The
//! loader creates it, the reconciler annotates it, and the write-batch
//! builder reads it.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A lexicon's dotted reverse-domain identifier, e.g. `com.example.post`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LexiconId(pub String);

impl LexiconId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LexiconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for LexiconId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LexiconId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Borrow<str> for LexiconId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// The parsed content of one local lexicon file.
///
/// `document` is the whole JSON tree, `id` included; `id` is lifted out so
/// callers never have to re-read it.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalLexicon {
    pub id: LexiconId,
    pub document: Value,
}

impl LocalLexicon {
    /// Wrap a parsed document. Returns `None` unless `document.id` is a
    /// non-empty string.
    pub fn from_document(document: Value) -> Option<Self> {
        let id = document
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())?
            .to_owned();
        Some(Self {
            id: LexiconId(id),
            document,
        })
    }
}

/// A lexicon record already stored in the remote repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedRecord {
    /// `at://<did>/<collection>/<rkey>`.
    pub uri: String,
    /// Content identifier. Informational only; never compared.
    pub cid: String,
    pub value: Value,
}

impl PublishedRecord {
    /// Record key: the final path segment of `uri`.
    pub fn rkey(&self) -> &str {
        self.uri.rsplit('/').next().unwrap_or(&self.uri)
    }

    /// The lexicon id declared inside the published document, if any.
    pub fn lexicon_id(&self) -> Option<&str> {
        self.value.get("id").and_then(Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Reconciliation dictionary
// ---------------------------------------------------------------------------

/// Publish classification of an entry, derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    /// No remote counterpart; will be created under a fresh record key.
    New,
    /// Remote counterpart differs; will be rewritten at its existing key.
    Updated,
    /// Remote counterpart is structurally equal; nothing to do.
    Skipped,
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryStatus::New => write!(f, "new"),
            EntryStatus::Updated => write!(f, "updated"),
            EntryStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// One row of the reconciliation dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconEntry {
    pub local: LocalLexicon,
    pub published: Option<PublishedRecord>,
    pub should_publish: bool,
}

impl LexiconEntry {
    /// A freshly loaded entry: no remote counterpart yet, publish by default.
    pub fn new(local: LocalLexicon) -> Self {
        Self {
            local,
            published: None,
            should_publish: true,
        }
    }

    pub fn status(&self) -> EntryStatus {
        match (self.should_publish, &self.published) {
            (false, _) => EntryStatus::Skipped,
            (true, Some(_)) => EntryStatus::Updated,
            (true, None) => EntryStatus::New,
        }
    }
}

/// All entries of a run, keyed by lexicon id.
pub type LexiconDictionary = BTreeMap<LexiconId, LexiconEntry>;
