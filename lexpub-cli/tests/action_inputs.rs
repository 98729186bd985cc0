use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

/// A command isolated from whatever runner environment the tests run under.
fn publish_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("publish-lexicons"));
    for var in [
        "INPUT_HANDLE",
        "INPUT_APP-PASSWORD",
        "INPUT_LEXICON-FILES",
        "INPUT_SERVICE",
        "GITHUB_ACTIONS",
        "GITHUB_OUTPUT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn action_cmd(handle: &str, password: &str, files: &[&Path]) -> Command {
    let files = files
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    let mut cmd = publish_cmd();
    cmd.env("GITHUB_ACTIONS", "true")
        .env("INPUT_HANDLE", handle)
        .env("INPUT_APP-PASSWORD", password)
        .env("INPUT_LEXICON-FILES", files)
        // Never reached by these tests; any attempt fails fast.
        .env("INPUT_SERVICE", "http://127.0.0.1:9");
    cmd
}

#[test]
fn help_lists_commands() {
    publish_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("publish"))
        .stdout(contains("status"))
        .stdout(contains("diff"));
}

#[test]
fn missing_handle_fails_with_annotation() {
    let dir = TempDir::new().unwrap();
    action_cmd("", "pw", &[dir.path()])
        .assert()
        .failure()
        .code(1)
        .stdout(contains("::error::Handle is required and cannot be empty"));
}

#[test]
fn missing_password_fails() {
    let dir = TempDir::new().unwrap();
    action_cmd("alice.test", "  ", &[dir.path()])
        .assert()
        .failure()
        .stdout(contains("::error::App password is required and cannot be empty"));
}

#[test]
fn blank_lexicon_files_fail() {
    action_cmd("alice.test", "pw", &[])
        .assert()
        .failure()
        .stdout(contains(
            "::error::At least one lexicon file path is required in lexicon-files input",
        ));
}

#[test]
fn empty_directory_succeeds_without_outputs() {
    let dir = TempDir::new().unwrap();
    let output_file = dir.path().join("github_output");
    fs::write(&output_file, "").unwrap();
    let lexicons = dir.path().join("lexicons");
    fs::create_dir(&lexicons).unwrap();

    action_cmd("alice.test", "pw", &[&lexicons])
        .env("GITHUB_OUTPUT", &output_file)
        .assert()
        .success()
        .stdout(contains("No lexicon files found in the specified paths."));

    assert_eq!(fs::read_to_string(&output_file).unwrap(), "");
}

#[test]
fn password_only_appears_in_mask_command() {
    let dir = TempDir::new().unwrap();
    let secret = "abcd-efgh-ijkl-mnop";
    let output = action_cmd("alice.test", secret, &[dir.path()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stdout.contains(&format!("::add-mask::{secret}")), "{stdout}");
    assert_eq!(stdout.matches(secret).count(), 1, "{stdout}");
    assert!(!stderr.contains(secret));
}

#[test]
fn unreadable_path_fails_with_access_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");
    action_cmd("alice.test", "pw", &[&missing])
        .assert()
        .failure()
        .stdout(contains("::error::Failed to access path").and(contains("does-not-exist")));
}

#[test]
fn invalid_json_fails_with_parse_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    action_cmd("alice.test", "pw", &[dir.path()])
        .assert()
        .failure()
        .stdout(contains("as valid JSON"));
}
