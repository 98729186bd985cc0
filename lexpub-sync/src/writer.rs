//! Write-batch construction and submission.
//!
//! Every entry flagged for publishing becomes one `create` write:
//!
//! - **updated** entries reuse the record key of their published record, so
//!   the write lands in the same slot and overwrites it;
//! - **new** entries get a fresh [TID](crate::tid) key.
//!
//! All writes go out in a single `applyWrites` call with validation on. The
//! batch is atomic on the remote side: it either applies fully or not at all.

use lexpub_core::{EntryStatus, LexiconDictionary, LexiconId};

use crate::error::SyncError;
use crate::tid::TidClock;
use crate::transport::{ApplyWritesInput, Transport, WriteOp, LEXICON_COLLECTION};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Ids per publish classification, in dictionary order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishStats {
    pub new: Vec<LexiconId>,
    pub updated: Vec<LexiconId>,
    pub skipped: Vec<LexiconId>,
}

impl PublishStats {
    pub fn from_dictionary(dictionary: &LexiconDictionary) -> Self {
        let mut stats = Self::default();
        for (id, entry) in dictionary {
            match entry.status() {
                EntryStatus::New => stats.new.push(id.clone()),
                EntryStatus::Updated => stats.updated.push(id.clone()),
                EntryStatus::Skipped => stats.skipped.push(id.clone()),
            }
        }
        stats
    }

    /// Number of entries that need a write.
    pub fn publish_count(&self) -> usize {
        self.new.len() + self.updated.len()
    }

    pub fn is_up_to_date(&self) -> bool {
        self.publish_count() == 0
    }
}

// ---------------------------------------------------------------------------
// Batch construction
// ---------------------------------------------------------------------------

/// One write, with the entry it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedWrite {
    pub id: LexiconId,
    pub status: EntryStatus,
    pub op: WriteOp,
}

/// Build one write per entry with `should_publish` set, in dictionary order.
pub fn build_writes(dictionary: &LexiconDictionary, clock: &mut TidClock) -> Vec<PlannedWrite> {
    dictionary
        .iter()
        .filter(|(_, entry)| entry.should_publish)
        .map(|(id, entry)| {
            let rkey = match &entry.published {
                Some(published) => published.rkey().to_string(),
                None => clock.next_tid(),
            };
            PlannedWrite {
                id: id.clone(),
                status: entry.status(),
                op: WriteOp::Create {
                    collection: LEXICON_COLLECTION.to_string(),
                    rkey,
                    value: entry.local.document.clone(),
                },
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Outcome of a completed publish step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub stats: PublishStats,
    /// Ids actually written, in batch order. Empty when nothing was due.
    pub published: Vec<LexiconId>,
}

impl PublishOutcome {
    /// Output name/value pairs for the job runner.
    pub fn outputs(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        Ok(vec![
            ("published-count", self.published.len().to_string()),
            ("new-count", self.stats.new.len().to_string()),
            ("updated-count", self.stats.updated.len().to_string()),
            ("skipped-count", self.stats.skipped.len().to_string()),
            ("published-lexicons", serde_json::to_string(&self.published)?),
            ("new-lexicons", serde_json::to_string(&self.stats.new)?),
            ("updated-lexicons", serde_json::to_string(&self.stats.updated)?),
            ("skipped-lexicons", serde_json::to_string(&self.stats.skipped)?),
        ])
    }
}

/// Submit every due write for `repo` as one atomic batch.
///
/// Makes no network call when nothing is due. A rejected batch fails the
/// whole step with the batch size in the message.
pub fn publish<T: Transport + ?Sized>(
    dictionary: &LexiconDictionary,
    transport: &mut T,
    repo: &str,
    clock: &mut TidClock,
) -> Result<PublishOutcome, SyncError> {
    let stats = PublishStats::from_dictionary(dictionary);
    let planned = build_writes(dictionary, clock);
    if planned.is_empty() {
        return Ok(PublishOutcome {
            stats,
            published: Vec::new(),
        });
    }

    let mut published = Vec::with_capacity(planned.len());
    let mut writes = Vec::with_capacity(planned.len());
    for write in planned {
        tracing::debug!("queued {} ({}) at {}", write.id, write.status, write.op.rkey());
        published.push(write.id);
        writes.push(write.op);
    }

    let input = ApplyWritesInput {
        repo: repo.to_string(),
        validate: true,
        writes,
    };
    let count = input.writes.len();
    transport
        .apply_writes(&input)
        .map_err(|source| SyncError::Publish { count, source })?;

    tracing::debug!("batch of {count} writes applied");
    Ok(PublishOutcome { stats, published })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::tid::is_tid;
    use crate::transport::{ListRecordsOutput, ListRecordsParams, Session};
    use lexpub_core::{LexiconEntry, LocalLexicon, PublishedRecord};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[derive(Default)]
    struct BatchRecorder {
        batches: Vec<ApplyWritesInput>,
        fail_with: Option<String>,
    }

    impl Transport for BatchRecorder {
        fn login(&mut self, _: &str, _: &str) -> Result<Session, TransportError> {
            unreachable!()
        }

        fn list_records(
            &mut self,
            _: &ListRecordsParams,
        ) -> Result<ListRecordsOutput, TransportError> {
            unreachable!()
        }

        fn apply_writes(&mut self, input: &ApplyWritesInput) -> Result<(), TransportError> {
            self.batches.push(input.clone());
            match &self.fail_with {
                Some(msg) => Err(TransportError::Network(msg.clone())),
                None => Ok(()),
            }
        }
    }

    fn entry(doc: Value, published: Option<(&str, Value)>, should_publish: bool) -> LexiconEntry {
        let local = LocalLexicon::from_document(doc).unwrap();
        LexiconEntry {
            local,
            published: published.map(|(rkey, value)| PublishedRecord {
                uri: format!("at://did:plc:test123/{LEXICON_COLLECTION}/{rkey}"),
                cid: "bafy".to_string(),
                value,
            }),
            should_publish,
        }
    }

    fn mixed_dictionary() -> LexiconDictionary {
        let mut dict = LexiconDictionary::new();
        for e in [
            entry(json!({"id": "com.example.a.new", "v": 1}), None, true),
            entry(
                json!({"id": "com.example.b.updated", "v": 2}),
                Some(("3jzfcijpj2z2a", json!({"id": "com.example.b.updated", "v": 1}))),
                true,
            ),
            entry(
                json!({"id": "com.example.c.same", "v": 1}),
                Some(("3jzfcijpj2z2b", json!({"id": "com.example.c.same", "v": 1}))),
                false,
            ),
        ] {
            dict.insert(e.local.id.clone(), e);
        }
        dict
    }

    #[test]
    fn stats_classify_every_entry() {
        let stats = PublishStats::from_dictionary(&mixed_dictionary());
        assert_eq!(stats.new, vec![LexiconId::from("com.example.a.new")]);
        assert_eq!(stats.updated, vec![LexiconId::from("com.example.b.updated")]);
        assert_eq!(stats.skipped, vec![LexiconId::from("com.example.c.same")]);
        assert_eq!(stats.publish_count(), 2);
    }

    #[test]
    fn updated_entries_reuse_rkey_and_new_entries_get_tids() {
        let mut clock = TidClock::with_clock_id(3);
        let writes = build_writes(&mixed_dictionary(), &mut clock);
        assert_eq!(writes.len(), 2);

        assert_eq!(writes[0].status, EntryStatus::New);
        assert!(is_tid(writes[0].op.rkey()));

        assert_eq!(writes[1].status, EntryStatus::Updated);
        assert_eq!(writes[1].op.rkey(), "3jzfcijpj2z2a");
        assert_eq!(
            writes[1].op.value(),
            &json!({"id": "com.example.b.updated", "v": 2})
        );
    }

    #[test]
    fn one_validated_batch_is_submitted() {
        let mut transport = BatchRecorder::default();
        let outcome = publish(
            &mixed_dictionary(),
            &mut transport,
            "did:plc:test123",
            &mut TidClock::with_clock_id(0),
        )
        .unwrap();

        assert_eq!(transport.batches.len(), 1);
        let batch = &transport.batches[0];
        assert!(batch.validate);
        assert_eq!(batch.repo, "did:plc:test123");
        assert_eq!(batch.writes.len(), 2);
        assert_eq!(
            outcome.published,
            vec![
                LexiconId::from("com.example.a.new"),
                LexiconId::from("com.example.b.updated")
            ]
        );
    }

    #[test]
    fn nothing_due_means_no_network_call() {
        let mut dict = mixed_dictionary();
        for e in dict.values_mut() {
            e.should_publish = false;
        }
        let mut transport = BatchRecorder::default();
        let outcome = publish(&dict, &mut transport, "did:plc:x", &mut TidClock::new()).unwrap();
        assert!(transport.batches.is_empty());
        assert!(outcome.published.is_empty());
        assert_eq!(outcome.stats.skipped.len(), 3);
    }

    #[test]
    fn rejected_batch_reports_size() {
        let mut transport = BatchRecorder {
            fail_with: Some("InvalidRequest".to_string()),
            ..Default::default()
        };
        let err = publish(
            &mixed_dictionary(),
            &mut transport,
            "did:plc:x",
            &mut TidClock::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::Publish { count: 2, .. }), "got: {err}");
        assert_eq!(err.to_string(), "Failed to publish 2 lexicons: InvalidRequest");
    }

    #[test]
    fn outputs_are_counts_and_json_id_lists() {
        let dict = mixed_dictionary();
        let outcome = PublishOutcome {
            stats: PublishStats::from_dictionary(&dict),
            published: vec![
                LexiconId::from("com.example.a.new"),
                LexiconId::from("com.example.b.updated"),
            ],
        };
        let outputs = outcome.outputs().unwrap();
        let get = |name: &str| {
            outputs
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("published-count"), "2");
        assert_eq!(get("new-count"), "1");
        assert_eq!(get("updated-count"), "1");
        assert_eq!(get("skipped-count"), "1");
        assert_eq!(
            get("published-lexicons"),
            r#"["com.example.a.new","com.example.b.updated"]"#
        );
        assert_eq!(get("skipped-lexicons"), r#"["com.example.c.same"]"#);
        assert_eq!(outputs.len(), 8);
    }
}
