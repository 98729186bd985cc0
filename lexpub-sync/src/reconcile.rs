//! Match remote records to local entries and decide what needs publishing.

use lexpub_core::{LexiconDictionary, LexiconId, PublishedRecord};

use crate::diff::{render_text_diff, structural_diff, Change};

/// Result of comparing one local entry with its remote counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub id: LexiconId,
    pub changes: Vec<Change>,
}

impl Comparison {
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Attach each remote record to the local entry with the same id.
///
/// Records without a local counterpart are ignored; nothing is ever deleted.
/// Returns how many records were attached.
pub fn attach_published(
    dictionary: &mut LexiconDictionary,
    records: Vec<PublishedRecord>,
) -> usize {
    let mut attached = 0;
    for record in records {
        let Some(id) = record.lexicon_id().map(str::to_owned) else {
            tracing::debug!("ignoring record without id: {}", record.uri);
            continue;
        };
        if let Some(entry) = dictionary.get_mut(id.as_str()) {
            entry.published = Some(record);
            attached += 1;
        }
    }
    attached
}

/// Compare every entry that has a published counterpart.
///
/// Structurally equal entries get `should_publish = false`; everything else
/// keeps its flag. Entries without a counterpart are not compared.
pub fn compare_entries(dictionary: &mut LexiconDictionary) -> Vec<Comparison> {
    let mut comparisons = Vec::new();
    for (id, entry) in dictionary.iter_mut() {
        let Some(published) = &entry.published else {
            continue;
        };
        let changes = structural_diff(&published.value, &entry.local.document);
        if changes.is_empty() {
            entry.should_publish = false;
            tracing::info!("- {id} (no changes, skip)");
        } else {
            tracing::info!("- {id} ({} changes)", changes.len());
            if tracing::enabled!(tracing::Level::DEBUG) {
                let text = render_text_diff(
                    id.as_str(),
                    Some(&published.value),
                    &entry.local.document,
                );
                tracing::debug!("\n{text}");
            }
        }
        comparisons.push(Comparison {
            id: id.clone(),
            changes,
        });
    }
    comparisons
}

/// [`attach_published`] followed by [`compare_entries`].
pub fn reconcile(
    dictionary: &mut LexiconDictionary,
    records: Vec<PublishedRecord>,
) -> Vec<Comparison> {
    attach_published(dictionary, records);
    compare_entries(dictionary)
}
