// subscout/tests/cli_integration.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::NamedTempFile;

/// Helper to create a test wordlist file
fn create_wordlist_file(prefixes: &[&str]) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Failed to create temp file");
    let content = prefixes.join("\n");
    fs::write(file.path(), content).expect("Failed to write to temp file");
    file
}

#[test]
fn test_help_shows_flags() {
    let mut cmd = Command::cargo_bin("subscout").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--wordlist"))
        .stdout(predicate::str::contains("--concurrency"))
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_missing_wordlist_flag_fails() {
    let mut cmd = Command::cargo_bin("subscout").unwrap();
    cmd.arg("example.com");

    cmd.assert().failure();
}

#[test]
fn test_zero_concurrency_rejected() {
    let wordlist = create_wordlist_file(&["www"]);
    let mut cmd = Command::cargo_bin("subscout").unwrap();
    cmd.args([
        "example.com",
        "--wordlist",
        wordlist.path().to_str().unwrap(),
        "--concurrency",
        "0",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Concurrency must be at least 1"));
}

#[test]
fn test_zero_timeout_rejected() {
    let wordlist = create_wordlist_file(&["www"]);
    let mut cmd = Command::cargo_bin("subscout").unwrap();
    cmd.args([
        "example.com",
        "--wordlist",
        wordlist.path().to_str().unwrap(),
        "--timeout",
        "0",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Timeout must be a positive"));
}

#[test]
fn test_json_with_pretty_rejected() {
    let wordlist = create_wordlist_file(&["www"]);
    let mut cmd = Command::cargo_bin("subscout").unwrap();
    cmd.args([
        "example.com",
        "--wordlist",
        wordlist.path().to_str().unwrap(),
        "--json",
        "--pretty",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Cannot use --json with --pretty"));
}

#[test]
fn test_missing_wordlist_file_fails() {
    let mut cmd = Command::cargo_bin("subscout").unwrap();
    cmd.args([
        "example.com",
        "--wordlist",
        "/nonexistent/wordlist.txt",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Wordlist error"));
}

#[test]
fn test_empty_wordlist_file_fails() {
    let wordlist = create_wordlist_file(&["", "# only a comment", "   "]);
    let mut cmd = Command::cargo_bin("subscout").unwrap();
    cmd.args([
        "example.com",
        "--wordlist",
        wordlist.path().to_str().unwrap(),
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no usable prefixes"));
}

#[test]
fn test_malformed_domain_fails_before_lookups() {
    let wordlist = create_wordlist_file(&["www"]);
    let mut cmd = Command::cargo_bin("subscout").unwrap();
    cmd.args([
        "not a domain",
        "--wordlist",
        wordlist.path().to_str().unwrap(),
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid domain"));
}
