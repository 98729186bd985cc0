//! `publish-lexicons publish` — reconcile and publish in one atomic batch.

use anyhow::Result;
use clap::Args;

use lexpub_sync::{
    pipeline::{self, RunMode, RunOutcome},
    RunConfig,
};

use crate::actions::ActionsSurface;
use crate::xrpc::XrpcClient;

/// Arguments for `publish-lexicons publish`.
#[derive(Args, Debug, Default)]
pub struct PublishArgs {
    /// Report what would be published without writing anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl PublishArgs {
    pub fn run(self, config: &RunConfig, surface: &mut ActionsSurface) -> Result<()> {
        let mode = if self.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Publish
        };
        let mut transport = XrpcClient::new(&config.service);

        // Errors pass through untouched; their text is the failure message.
        match pipeline::run(config, &mut transport, surface, mode)? {
            RunOutcome::WouldPublish(stats) => {
                tracing::info!(
                    "[dry-run] {} new, {} updated, {} unchanged",
                    stats.new.len(),
                    stats.updated.len(),
                    stats.skipped.len()
                );
            }
            RunOutcome::NoLexicons | RunOutcome::UpToDate(_) | RunOutcome::Published(_) => {}
        }
        Ok(())
    }
}
