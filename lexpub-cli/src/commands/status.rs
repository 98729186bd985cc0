//! `publish-lexicons status` — per-lexicon reconciliation report.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use lexpub_core::EntryStatus;
use lexpub_sync::{pipeline, pipeline::Plan, RunConfig};

use crate::actions::ActionsSurface;
use crate::xrpc::XrpcClient;

/// Arguments for `publish-lexicons status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, config: &RunConfig, surface: &mut ActionsSurface) -> Result<()> {
        let mut transport = XrpcClient::new(&config.service);
        let Some(plan) = pipeline::plan(config, &mut transport, surface)? else {
            return Ok(());
        };

        let rows = build_rows(&plan);
        if self.json {
            print_json(&plan, rows)?;
            return Ok(());
        }
        print_table(&plan, rows);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
struct LexiconStatusRow {
    id: String,
    status: &'static str,
    changes: usize,
    rkey: Option<String>,
}

#[derive(Serialize)]
struct StatusReportJson {
    repo: String,
    new: usize,
    updated: usize,
    skipped: usize,
    lexicons: Vec<LexiconStatusRow>,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "lexicon")]
    id: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "changes")]
    changes: usize,
    #[tabled(rename = "record key")]
    rkey: String,
}

fn build_rows(plan: &Plan) -> Vec<LexiconStatusRow> {
    plan.dictionary
        .iter()
        .map(|(id, entry)| {
            let changes = plan
                .comparisons
                .iter()
                .find(|c| &c.id == id)
                .map(|c| c.changes.len())
                .unwrap_or(0);
            LexiconStatusRow {
                id: id.to_string(),
                status: status_key(entry.status()),
                changes,
                rkey: entry.published.as_ref().map(|p| p.rkey().to_string()),
            }
        })
        .collect()
}

fn print_json(plan: &Plan, rows: Vec<LexiconStatusRow>) -> Result<()> {
    let stats = plan.stats();
    let payload = StatusReportJson {
        repo: plan.session.did.clone(),
        new: stats.new.len(),
        updated: stats.updated.len(),
        skipped: stats.skipped.len(),
        lexicons: rows,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(plan: &Plan, rows: Vec<LexiconStatusRow>) {
    let stats = plan.stats();
    println!(
        "publish-lexicons v{} | {} | {} new | {} updated | {} unchanged",
        env!("CARGO_PKG_VERSION"),
        plan.session.did,
        stats.new.len(),
        stats.updated.len(),
        stats.skipped.len(),
    );

    let table_rows: Vec<StatusTableRow> = rows
        .into_iter()
        .map(|row| StatusTableRow {
            status: status_label(row.status),
            id: row.id,
            changes: row.changes,
            rkey: row.rkey.unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");

    if !stats.is_up_to_date() {
        println!("Run 'publish-lexicons publish' to publish {} lexicons.", stats.publish_count());
    }
}

fn status_key(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::New => "new",
        EntryStatus::Updated => "updated",
        EntryStatus::Skipped => "unchanged",
    }
}

fn status_label(key: &str) -> String {
    match key {
        "new" => "NEW".green().bold().to_string(),
        "updated" => "UPDATED".yellow().bold().to_string(),
        _ => "UNCHANGED".bright_black().to_string(),
    }
}
