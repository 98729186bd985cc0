//! `publish-lexicons diff` — preview the documents publish would send, as unified diffs.

use anyhow::Result;
use clap::Args;

use lexpub_core::EntryStatus;
use lexpub_sync::{diff::render_text_diff, pipeline, RunConfig};

use crate::actions::ActionsSurface;
use crate::xrpc::XrpcClient;

/// Arguments for `publish-lexicons diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {}

impl DiffArgs {
    pub fn run(self, config: &RunConfig, surface: &mut ActionsSurface) -> Result<()> {
        let mut transport = XrpcClient::new(&config.service);
        let Some(plan) = pipeline::plan(config, &mut transport, surface)? else {
            return Ok(());
        };

        let mut printed = 0;
        for (id, entry) in &plan.dictionary {
            let old = match entry.status() {
                EntryStatus::Skipped => continue,
                EntryStatus::New => None,
                EntryStatus::Updated => entry.published.as_ref().map(|p| &p.value),
            };
            let diff = render_text_diff(id.as_str(), old, &entry.local.document);
            print!("{diff}");
            if !diff.ends_with('\n') {
                println!();
            }
            printed += 1;
        }

        if printed == 0 {
            println!("No differences.");
        }
        Ok(())
    }
}
