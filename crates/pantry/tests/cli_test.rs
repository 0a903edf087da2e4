#![allow(clippy::unwrap_used)]
// End-to-end tests for the `pantry` binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pantry_config::Config;
use pantry_core::{ConfigEntry, EntryData, ResolveStrategy};

// ── Helpers ─────────────────────────────────────────────────────────

fn pantry(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pantry").unwrap();
    cmd.env("PANTRY_CONFIG", config)
        .env_remove("SUPERVISOR_TOKEN")
        .env_remove("RUST_LOG")
        .arg("--color")
        .arg("never");
    cmd
}

fn config_with_entry(dir: &Path, base_url: &str) -> (PathBuf, ConfigEntry) {
    let path = dir.join("config.toml");
    let entry = ConfigEntry::new(
        "Bogyi Konyha (Add-on)",
        EntryData {
            strategy: ResolveStrategy::Discover,
            base_url: Some(Url::parse(base_url).unwrap()),
        },
    );
    let mut config = Config::default();
    config.add_entry(entry.clone());
    pantry_config::save_config_to(&config, &path).unwrap();
    (path, entry)
}

// ── Basics ──────────────────────────────────────────────────────────

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("pantry")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("entries"))
        .stdout(predicate::str::contains("items"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn test_completions() {
    Command::cargo_bin("pantry")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pantry"));
}

// ── Entries ─────────────────────────────────────────────────────────

#[test]
fn test_entries_list_empty() {
    let dir = tempfile::tempdir().unwrap();
    pantry(&dir.path().join("config.toml"))
        .args(["entries", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_entries_remove() {
    let dir = tempfile::tempdir().unwrap();
    let (path, entry) = config_with_entry(dir.path(), "http://127.0.0.1:1/api/pantry");

    pantry(&path)
        .args(["entries", "list", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains(entry.entry_id.to_string()));

    pantry(&path)
        .args(["entries", "remove", "-y", &entry.entry_id.to_string()[..8]])
        .assert()
        .success();

    let config = pantry_config::load_config_from(&path).unwrap();
    assert!(config.entries.is_empty());

    pantry(&path)
        .args(["entries", "remove", "-y", "nope"])
        .assert()
        .code(4);
}

#[test]
fn test_defaults_output_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[defaults]\noutput = \"json\"\ncolor = \"never\"\n").unwrap();

    Command::cargo_bin("pantry")
        .unwrap()
        .env("PANTRY_CONFIG", &path)
        .env_remove("PANTRY_OUTPUT")
        .args(["entries", "list"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));

    // An explicit flag still wins over the file.
    pantry(&path)
        .args(["entries", "list", "-o", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n\n"));
}

#[test]
fn test_invalid_defaults_output_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[defaults]\noutput = \"xml\"\n").unwrap();

    Command::cargo_bin("pantry")
        .unwrap()
        .env("PANTRY_CONFIG", &path)
        .env_remove("PANTRY_OUTPUT")
        .args(["entries", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("defaults.output"));
}

// ── Setup ───────────────────────────────────────────────────────────

#[test]
fn test_setup_internal_hostname_then_single_instance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    pantry(&path)
        .args(["setup", "--strategy", "internal-hostname", "-y", "-o", "plain"])
        .assert()
        .success();

    let config = pantry_config::load_config_from(&path).unwrap();
    assert_eq!(config.entries.len(), 1);
    assert_eq!(
        config.entries[0].data.strategy,
        ResolveStrategy::InternalHostname
    );
    assert_eq!(config.entries[0].data.base_url, None);

    pantry(&path)
        .args(["setup", "-y"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("single_instance_allowed"));
}

#[test]
fn test_setup_discover_without_supervisor() {
    let dir = tempfile::tempdir().unwrap();
    pantry(&dir.path().join("config.toml"))
        .args(["setup", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not_hassio"));
}

// ── Items ───────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_items_renders_sensors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pantry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "milk", "quantity": 2, "unit": "l", "expiryDate": "2025-01-01"},
            {"name": "no id"}
        ])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (path, _) = config_with_entry(dir.path(), &format!("{}/api/pantry", server.uri()));

    let output = tokio::task::spawn_blocking(move || {
        pantry(&path).args(["items", "-o", "json"]).output().unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let items: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["name"], "Pantry: Milk");
    assert_eq!(items[0]["state"], 2.0);
    assert_eq!(items[0]["unit_of_measurement"], "liters");
    assert_eq!(items[0]["attributes"]["expiry_date"], "2025-01-01");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_items_reports_addon_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pantry"))
        .respond_with(ResponseTemplate::new(503).set_body_string("addon error"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (path, _) = config_with_entry(dir.path(), &format!("{}/api/pantry", server.uri()));

    let output = tokio::task::spawn_blocking(move || pantry(&path).arg("items").output().unwrap())
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(7));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("503"), "{stderr}");
}

#[test]
fn test_items_without_entries() {
    let dir = tempfile::tempdir().unwrap();
    pantry(&dir.path().join("config.toml"))
        .arg("items")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("pantry setup"));
}

// ── Watch ───────────────────────────────────────────────────────────

#[test]
fn test_watch_rejects_zero_interval() {
    let dir = tempfile::tempdir().unwrap();
    let (path, _) = config_with_entry(dir.path(), "http://127.0.0.1:1/api/pantry");

    pantry(&path)
        .args(["watch", "--interval", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("interval"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_renders_after_every_poll() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pantry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "milk", "quantity": 2, "unit": "l"}
        ])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (path, _) = config_with_entry(dir.path(), &format!("{}/api/pantry", server.uri()));

    // watch only stops on ctrl-c; the timeout kills it and keeps what it printed.
    let output = tokio::task::spawn_blocking(move || {
        pantry(&path)
            .args(["watch", "--interval", "1", "-o", "plain"])
            .timeout(Duration::from_secs(4))
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    let renders = stdout
        .lines()
        .filter(|line| *line == "bogyikonya_pantry_1\t2")
        .count();
    assert!(renders >= 2, "expected repeated renders, got:\n{stdout}");
    assert!(server.received_requests().await.unwrap().len() >= 2);
}
