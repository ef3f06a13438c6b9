//! CLI integration tests for hoops admin commands.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::Path;

use assert_cmd::Command;
use assert_fs::TempDir;
use hoops::config::GameRules;
use hoops::store::{SqliteStore, Store};
use predicates::prelude::*;

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    fn data_dir_str(&self) -> String {
        self.data_dir().to_string_lossy().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("hoops").expect("failed to find binary");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    fn init(&self) -> assert_cmd::assert::Assert {
        self.cmd()
            .args(["admin", "init", "--data-dir", &self.data_dir_str()])
            .assert()
    }

    fn store(&self) -> SqliteStore {
        SqliteStore::new(self.data_dir().join("hoops.db")).expect("open database")
    }
}

#[test]
fn test_init_creates_database_token_and_rules() {
    let ctx = TestContext::new();

    ctx.init()
        .success()
        .stdout(predicate::str::contains("hoops_"));

    let token = std::fs::read_to_string(ctx.data_dir().join(".admin_token")).unwrap();
    assert!(token.starts_with("hoops_"));
    assert!(ctx.data_dir().join("hoops.db").exists());

    let rules = GameRules::load(ctx.data_dir().join("rules.toml")).unwrap();
    assert_eq!(rules, GameRules::default());

    assert!(ctx.store().has_admin_token().unwrap());
}

#[test]
fn test_init_twice_fails() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.init()
        .failure()
        .stderr(predicate::str::contains("already initialized"));

    assert_eq!(ctx.store().list_tokens().unwrap().len(), 1);
}

#[test]
fn test_init_rejects_invalid_rules_file() {
    let ctx = TestContext::new();
    std::fs::write(ctx.data_dir().join("rules.toml"), "overtime_ms = \"long\"\n").unwrap();

    ctx.init()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn test_issue_token_requires_init() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["admin", "issue-token", "--data-dir", &ctx.data_dir_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_issue_token_with_expiry() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.cmd()
        .args([
            "admin",
            "issue-token",
            "--data-dir",
            &ctx.data_dir_str(),
            "--expires-in-days",
            "7",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("hoops_"))
        .stdout(predicate::str::contains("Expires at:"));

    let tokens = ctx.store().list_tokens().unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens.iter().filter(|t| t.expires_at.is_some()).count(), 1);
}

#[test]
fn test_issue_token_rejects_non_positive_expiry() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.cmd()
        .args([
            "admin",
            "issue-token",
            "--data-dir",
            &ctx.data_dir_str(),
            "--expires-in-days",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be positive"));
}

#[test]
fn test_issue_token_rejects_overflowing_expiry() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.cmd()
        .args([
            "admin",
            "issue-token",
            "--data-dir",
            &ctx.data_dir_str(),
            "--expires-in-days",
            "9223372036854775807",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too large"));

    ctx.cmd()
        .args([
            "admin",
            "issue-token",
            "--data-dir",
            &ctx.data_dir_str(),
            "--expires-in-days",
            "500000000",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too large"));

    assert_eq!(ctx.store().list_tokens().unwrap().len(), 1);
}

#[test]
fn test_list_tokens_shows_every_token() {
    let ctx = TestContext::new();
    ctx.init().success();
    ctx.cmd()
        .args([
            "admin",
            "issue-token",
            "--data-dir",
            &ctx.data_dir_str(),
            "--expires-in-days",
            "30",
        ])
        .assert()
        .success();

    let tokens = ctx.store().list_tokens().unwrap();
    assert_eq!(tokens.len(), 2);

    let mut assert = ctx
        .cmd()
        .args(["admin", "list-tokens", "--data-dir", &ctx.data_dir_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("never"));
    for token in &tokens {
        assert = assert.stdout(predicate::str::contains(token.id.as_str()));
    }
}

#[test]
fn test_list_tokens_requires_init() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["admin", "list-tokens", "--data-dir", &ctx.data_dir_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_serve_requires_init() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["serve", "--data-dir", &ctx.data_dir_str(), "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}
