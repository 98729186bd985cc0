//! GitHub Actions workflow commands.
//!
//! When `GITHUB_ACTIONS=true` the surface speaks the runner's `::command::`
//! syntax; otherwise it degrades to plain terminal output so the binary is
//! usable locally.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;

use lexpub_sync::tid::TidClock;
use lexpub_sync::JobSurface;

use crate::logging::redact;

pub struct ActionsSurface {
    annotate: bool,
    output_file: Option<PathBuf>,
    secrets: Vec<String>,
}

impl ActionsSurface {
    pub fn new(annotate: bool, output_file: Option<PathBuf>) -> Self {
        Self {
            annotate,
            output_file,
            secrets: Vec::new(),
        }
    }

    pub fn from_env() -> Self {
        let annotate = std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true");
        let output_file = std::env::var_os("GITHUB_OUTPUT")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::new(annotate, output_file)
    }

    /// Report the failure that ends the run.
    pub fn fail(&self, message: &str) {
        let message = redact(message, &self.secrets);
        if self.annotate {
            println!("::error::{}", escape_data(&message));
        } else {
            eprintln!("{} {}", "error:".red().bold(), message);
        }
    }

    fn write_output(&self, name: &str, value: &str) -> io::Result<()> {
        let Some(path) = &self.output_file else {
            println!("{name}={value}");
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if value.contains('\n') {
            let delimiter = format!("ghadelimiter_{}", TidClock::new().next_tid());
            writeln!(file, "{name}<<{delimiter}\n{value}\n{delimiter}")
        } else {
            writeln!(file, "{name}={value}")
        }
    }
}

impl JobSurface for ActionsSurface {
    fn mask_secret(&mut self, secret: &str) {
        if secret.is_empty() {
            return;
        }
        if self.annotate {
            println!("::add-mask::{}", escape_data(secret));
        }
        self.secrets.push(secret.to_string());
    }

    fn start_group(&mut self, title: &str) {
        let title = redact(title, &self.secrets);
        if self.annotate {
            println!("::group::{}", escape_data(&title));
        } else {
            println!("{}", title.bold());
        }
    }

    fn end_group(&mut self) {
        if self.annotate {
            println!("::endgroup::");
        }
    }

    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.write_output(name, value)
    }
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
