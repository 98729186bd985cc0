//! Remote inventory: every lexicon record currently published.

use lexpub_core::PublishedRecord;

use crate::error::TransportError;
use crate::transport::{ListRecordsParams, Transport, LEXICON_COLLECTION, PAGE_SIZE};

/// Page through `listRecords` until the server stops returning a cursor.
///
/// Records are returned in server order, page after page. The first failed
/// request aborts the fetch; no partial inventory is returned.
pub fn fetch_all<T: Transport + ?Sized>(
    transport: &mut T,
    repo: &str,
) -> Result<Vec<PublishedRecord>, TransportError> {
    let mut records = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let params = ListRecordsParams {
            repo: repo.to_string(),
            collection: LEXICON_COLLECTION.to_string(),
            limit: PAGE_SIZE,
            cursor: cursor.take(),
        };
        let page = transport.list_records(&params)?;
        pages += 1;
        tracing::debug!("page {pages}: {} records", page.records.len());
        records.extend(page.records);

        // An empty cursor ends pagination just like a missing one.
        match page.cursor.filter(|c| !c.is_empty()) {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(records)
}
