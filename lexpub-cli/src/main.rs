//! publish-lexicons — sync local lexicon schemas to an AT Protocol repository.
//!
//! # Usage
//!
//! ```text
//! publish-lexicons [publish] [--dry-run]  <inputs>
//! publish-lexicons status [--json]        <inputs>
//! publish-lexicons diff                   <inputs>
//!
//! <inputs>: --handle <h> --app-password <pw> --lexicon-files <path>...
//! ```
//!
//! Every input can also come from the job runner's environment
//! (`INPUT_HANDLE`, `INPUT_APP-PASSWORD`, `INPUT_LEXICON-FILES`,
//! `INPUT_SERVICE`), so the binary runs unchanged as a GitHub Action step.

mod actions;
mod commands;
mod logging;
mod xrpc;

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use actions::ActionsSurface;
use commands::{diff::DiffArgs, publish::PublishArgs, status::StatusArgs};
use lexpub_sync::RunConfig;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "publish-lexicons",
    version,
    about = "Publish lexicon schemas to an AT Protocol repository",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    inputs: InputArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update every changed lexicon in one batch (default).
    Publish(PublishArgs),

    /// Show how each local lexicon compares with the published set.
    Status(StatusArgs),

    /// Show unified diffs of what publish would write.
    Diff(DiffArgs),
}

/// Job inputs shared by every command.
#[derive(Args, Debug)]
struct InputArgs {
    /// Account handle or DID used to log in.
    #[arg(long, env = "INPUT_HANDLE", global = true, default_value = "")]
    handle: String,

    /// App password for the account.
    #[arg(
        long = "app-password",
        env = "INPUT_APP-PASSWORD",
        hide_env_values = true,
        global = true,
        default_value = ""
    )]
    app_password: String,

    /// Lexicon files or directories. Repeat the flag or separate with newlines.
    #[arg(
        long = "lexicon-files",
        env = "INPUT_LEXICON-FILES",
        value_delimiter = '\n',
        global = true
    )]
    lexicon_files: Vec<String>,

    /// PDS endpoint. Defaults to https://bsky.social.
    #[arg(long, env = "INPUT_SERVICE", global = true)]
    service: Option<String>,
}

impl InputArgs {
    fn into_config(self) -> RunConfig {
        RunConfig::from_inputs(
            self.handle,
            self.app_password,
            self.lexicon_files,
            self.service.as_deref(),
        )
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Secrets must be registered before the first log line.
    logging::init_tracing([cli.inputs.app_password.clone()]);
    tracing::debug!("Using publish-lexicons v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.inputs.into_config();
    let mut surface = ActionsSurface::from_env();

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Publish(PublishArgs::default()));
    let result = match command {
        Commands::Publish(args) => args.run(&config, &mut surface),
        Commands::Status(args) => args.run(&config, &mut surface),
        Commands::Diff(args) => args.run(&config, &mut surface),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            surface.fail(&err.to_string());
            ExitCode::FAILURE
        }
    }
}
