//! End-to-end run: load, authenticate, fetch, reconcile, publish.
//!
//! [`plan`] covers everything up to and including reconciliation and is
//! shared by `publish`, `publish --dry-run`, and `diff`. [`run`] adds the
//! write batch and the job outputs.

use lexpub_core::{load_lexicons, LexiconDictionary, PublishedRecord};

use crate::config::RunConfig;
use crate::error::SyncError;
use crate::inventory;
use crate::reconcile::{self, Comparison};
use crate::surface::JobSurface;
use crate::tid::TidClock;
use crate::transport::{Session, Transport};
use crate::writer::{self, PublishOutcome, PublishStats};

/// Whether the write batch is actually submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Publish,
    DryRun,
}

/// A reconciled dictionary, ready to publish.
#[derive(Debug)]
pub struct Plan {
    pub session: Session,
    pub dictionary: LexiconDictionary,
    pub comparisons: Vec<Comparison>,
}

impl Plan {
    pub fn stats(&self) -> PublishStats {
        PublishStats::from_dictionary(&self.dictionary)
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The lexicon paths held no lexicon documents. Nothing else ran.
    NoLexicons,
    /// Every local lexicon already matches its published version.
    UpToDate(PublishStats),
    /// Dry run: what would have been published.
    WouldPublish(PublishStats),
    /// The batch was applied and outputs were set.
    Published(PublishOutcome),
}

/// Validate, load, authenticate, fetch the remote inventory and reconcile.
///
/// Returns `Ok(None)` when no lexicon documents were found; in that case no
/// network call is made.
pub fn plan<T, S>(
    config: &RunConfig,
    transport: &mut T,
    surface: &mut S,
) -> Result<Option<Plan>, SyncError>
where
    T: Transport + ?Sized,
    S: JobSurface + ?Sized,
{
    surface.mask_secret(&config.app_password);
    config.validate()?;

    surface.start_group("Loading lexicon files...");
    let loaded = load_lexicons(config.lexicon_files.iter().map(String::as_str));
    let mut dictionary = match loaded {
        Ok(dictionary) => dictionary,
        Err(err) => {
            surface.end_group();
            return Err(err.into());
        }
    };
    if dictionary.is_empty() {
        tracing::warn!("No lexicon files found in the specified paths.");
        surface.end_group();
        return Ok(None);
    }
    tracing::info!("Loaded {} lexicon files.", dictionary.len());
    surface.end_group();

    tracing::info!(
        "Authenticating as {} via {}...",
        config.handle,
        config.service
    );
    let session = transport.login(&config.handle, &config.app_password)?;
    tracing::info!("✓ Authentication successful");

    tracing::info!("Retrieving published lexicons from repository...");
    let records = inventory::fetch_all(transport, &session.did)?;
    log_published(surface, &records);

    let comparisons = if records.is_empty() {
        Vec::new()
    } else {
        surface.start_group("Comparing local lexicons with published versions...");
        let comparisons = reconcile::reconcile(&mut dictionary, records);
        surface.end_group();
        comparisons
    };

    Ok(Some(Plan {
        session,
        dictionary,
        comparisons,
    }))
}

/// Full run. In [`RunMode::DryRun`] the batch is never submitted and no
/// outputs are set. An up-to-date run still sets outputs, with a zero
/// published count.
pub fn run<T, S>(
    config: &RunConfig,
    transport: &mut T,
    surface: &mut S,
    mode: RunMode,
) -> Result<RunOutcome, SyncError>
where
    T: Transport + ?Sized,
    S: JobSurface + ?Sized,
{
    let Some(plan) = plan(config, transport, surface)? else {
        return Ok(RunOutcome::NoLexicons);
    };

    let stats = plan.stats();
    if stats.is_up_to_date() {
        tracing::info!("✓ No changes detected - all lexicons are up to date");
        let outcome = PublishOutcome {
            stats,
            published: Vec::new(),
        };
        if mode == RunMode::Publish {
            set_outputs(surface, &outcome)?;
        }
        return Ok(RunOutcome::UpToDate(outcome.stats));
    }

    tracing::info!(
        "Publishing {} lexicons ({} new, {} updated)...",
        stats.publish_count(),
        stats.new.len(),
        stats.updated.len()
    );

    if mode == RunMode::DryRun {
        for id in &stats.new {
            tracing::info!("[dry-run] would create {id}");
        }
        for id in &stats.updated {
            tracing::info!("[dry-run] would update {id}");
        }
        return Ok(RunOutcome::WouldPublish(stats));
    }

    let mut clock = TidClock::new();
    let outcome = writer::publish(&plan.dictionary, transport, &plan.session.did, &mut clock)?;

    surface.start_group(&format!(
        "✅ Successfully published {} lexicons ({} new, {} updated)",
        outcome.published.len(),
        outcome.stats.new.len(),
        outcome.stats.updated.len()
    ));
    for id in &outcome.published {
        tracing::info!("- {id}");
    }
    surface.end_group();

    set_outputs(surface, &outcome)?;
    Ok(RunOutcome::Published(outcome))
}

fn set_outputs<S: JobSurface + ?Sized>(
    surface: &mut S,
    outcome: &PublishOutcome,
) -> Result<(), SyncError> {
    for (name, value) in outcome.outputs()? {
        surface
            .set_output(name, &value)
            .map_err(|source| SyncError::Output {
                name: name.to_string(),
                source,
            })?;
    }
    Ok(())
}

fn log_published<S: JobSurface + ?Sized>(surface: &mut S, records: &[PublishedRecord]) {
    surface.start_group(&format!("Found {} published lexicons", records.len()));
    for record in records {
        match record.lexicon_id() {
            Some(id) => tracing::info!("- {id}"),
            None => tracing::info!("- {} (no id)", record.uri),
        }
    }
    surface.end_group();
}
