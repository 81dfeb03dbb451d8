//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a clearops command pointed at a temp database
pub fn clearops(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("clearops"));
    cmd.current_dir(tmp.path())
        .env("CLEAROPS_DB", tmp.path().join("test.db"))
        .env("CLEAROPS_CONFIG", tmp.path().join("clearops.yaml"));
    cmd
}

/// Helper to create an initialized workspace
pub fn setup_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    clearops(&tmp).arg("init").assert().success();
    tmp
}

/// Helper to create a shipment, returning its id
pub fn create_shipment(tmp: &TempDir, company: &str, tracking: &str) -> String {
    let output = clearops(tmp)
        .args(["new", "--company", company, "--tracking", tracking])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    // "✓ Created shipment <ULID> (<tracking>)"
    stdout
        .split_whitespace()
        .find(|w| w.len() == 26 && w.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Helper to attach a document to a shipment
pub fn add_document(tmp: &TempDir, id: &str, doc_type: &str) {
    clearops(tmp)
        .args(["add-doc", id, doc_type])
        .assert()
        .success();
}
