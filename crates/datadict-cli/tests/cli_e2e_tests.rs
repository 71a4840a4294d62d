//! End-to-end tests for the datadict binary against a SQLite database.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection, Executor};
use tempfile::TempDir;

fn datadict(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("datadict"));
    cmd.current_dir(dir).env_remove("DATADICT_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn execute(path: &Path, sql: &str) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        let mut conn = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .connect()
            .await
            .unwrap();
        conn.execute(sql).await.unwrap();
        conn.close().await.unwrap();
    });
}

/// A temp dir with `shop.db` (users, orders) and a `config.toml` pointing at it.
fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    execute(
        &dir.path().join("shop.db"),
        "CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT NOT NULL);
         CREATE TABLE orders (id INTEGER PRIMARY KEY, total NUMERIC DEFAULT 0);",
    );
    let db_path = dir.path().join("shop.db").to_string_lossy().replace('\\', "/");
    fs::write(
        dir.path().join("config.toml"),
        format!(
            "[database]\ndriver = \"sqlite\"\ndatabase = \"{}\"\n\n[output]\nfilename = \"shop\"\ndirectory = \"out\"\n",
            db_path
        ),
    )
    .unwrap();
    dir
}

fn sync_json(dir: &Path, tables: &str) -> Value {
    let output = datadict(dir)
        .args(["sync", "--tables", tables, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_help_output() {
    let dir = TempDir::new().unwrap();
    datadict(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("list-env"));
}

#[test]
fn test_missing_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    datadict(dir.path())
        .arg("status")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration not found"));
}

#[test]
fn test_list_env_marks_default() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        r#"
[environment]
default = "dev"

[databases.dev]
driver = "sqlite"
database = "dev.db"

[databases.prod]
driver = "sqlite"
database = "prod.db"
"#,
    )
    .unwrap();

    datadict(dir.path())
        .arg("list-env")
        .assert()
        .success()
        .stdout(predicate::str::contains("dev"))
        .stdout(predicate::str::contains("(default)"))
        .stdout(predicate::str::contains("prod"));
}

#[test]
fn test_connection_to_sqlite() {
    let dir = workspace();
    datadict(dir.path())
        .arg("test-connection")
        .assert()
        .success()
        .stdout(predicate::str::contains("Connection succeeded"));
}

#[test]
fn test_sync_then_incremental_update() {
    let dir = workspace();

    let first = sync_json(dir.path(), "users");
    assert_eq!(first["guard"], "first_run");
    assert_eq!(first["updated"], serde_json::json!(["users"]));
    assert_eq!(first["tables_count"], 1);
    assert!(dir.path().join("out/shop_interactive/index.html").is_file());
    assert!(dir.path().join("out/shop_interactive/index.sync.json").is_file());

    let second = sync_json(dir.path(), "orders,ghost");
    assert_eq!(second["guard"], "verified");
    assert_eq!(second["added"], serde_json::json!(["orders"]));
    assert_eq!(second["not_found"], serde_json::json!(["ghost"]));
    assert_eq!(second["tables_count"], 2);
}

#[test]
fn test_sync_uses_default_tables_file() {
    let dir = workspace();
    fs::write(dir.path().join("sync_tables.txt"), "# changed today\norders\n").unwrap();

    datadict(dir.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("orders"));
}

#[test]
fn test_sync_without_tables_fails() {
    let dir = workspace();
    datadict(dir.path())
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = workspace();
    datadict(dir.path())
        .args(["sync", "--tables", "users", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing was written"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_status_after_sync() {
    let dir = workspace();
    sync_json(dir.path(), "users,orders");

    let output = datadict(dir.path()).args(["status", "--json"]).output().unwrap();
    assert!(output.status.success());
    let status: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["artifact_exists"], true);
    assert_eq!(status["artifact_tables"], 2);
    assert_eq!(status["identity_matches"], true);
    assert_eq!(status["artifact_modified"], false);
}

#[test]
fn test_generate_markdown_with_exclude() {
    let dir = workspace();
    datadict(dir.path())
        .args(["generate", "--format", "markdown", "--exclude-tables", "orders"])
        .assert()
        .success();

    let md = fs::read_to_string(dir.path().join("out/shop.md")).unwrap();
    assert!(md.contains("## users"));
    assert!(!md.contains("## orders"));
}

#[test]
fn test_generate_interactive_then_sync_verifies() {
    let dir = workspace();
    datadict(dir.path()).arg("generate").assert().success();

    let report = sync_json(dir.path(), "users");
    assert_eq!(report["guard"], "verified");
    assert_eq!(report["tables_count"], 2);
}
