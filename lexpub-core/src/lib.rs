//! lexpub core library — lexicon domain types, local loading, errors.
//!
//! - [`types`] — newtypes and the reconciliation dictionary
//! - [`error`] — [`LoadError`]
//! - [`loader`] — recursive discovery of local lexicon documents

pub mod error;
pub mod loader;
pub mod types;

pub use error::LoadError;
pub use loader::{load_lexicons, PathDetails};
pub use types::{
    EntryStatus, LexiconDictionary, LexiconEntry, LexiconId, LocalLexicon, PublishedRecord,
};
