//! CLI integration tests

mod common;

use common::{add_document, clearops, create_shipment, setup_workspace};
use predicates::prelude::*;

#[test]
fn test_init_creates_database() {
    let tmp = tempfile::TempDir::new().unwrap();
    clearops(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database ready"));
    assert!(tmp.path().join("test.db").exists());
}

#[test]
fn test_new_prints_shipment_id() {
    let tmp = setup_workspace();
    let id = create_shipment(&tmp, "CO-1", "MSCU1234567");
    assert_eq!(id.len(), 26, "expected a ULID, got: {:?}", id);
}

#[test]
fn test_bl_upload_advances_draft_shipment() {
    let tmp = setup_workspace();
    let id = create_shipment(&tmp, "CO-1", "MSCU1234567");

    clearops(&tmp)
        .args(["add-doc", &id, "BL"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status advanced"))
        .stdout(predicate::str::contains("PENDING"));
}

#[test]
fn test_untracked_document_leaves_status_unchanged() {
    let tmp = setup_workspace();
    let id = create_shipment(&tmp, "CO-1", "MSCU1234567");

    clearops(&tmp)
        .args(["add-doc", &id, "PACKING_LIST"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status unchanged"));
}

#[test]
fn test_reupload_is_reported_as_noop() {
    let tmp = setup_workspace();
    let id = create_shipment(&tmp, "CO-1", "MSCU1234567");
    add_document(&tmp, &id, "BL");

    clearops(&tmp)
        .args(["add-doc", &id, "BL"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status unchanged"));
}

#[test]
fn test_show_renders_milestones_and_next_steps() {
    let tmp = setup_workspace();
    let id = create_shipment(&tmp, "CO-1", "MSCU1234567");
    add_document(&tmp, &id, "BL");

    clearops(&tmp)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending arrival"))
        .stdout(predicate::str::contains("Next steps"))
        .stdout(predicate::str::contains("Timeline"));
}

#[test]
fn test_show_json_contains_next_steps() {
    let tmp = setup_workspace();
    let id = create_shipment(&tmp, "CO-1", "MSCU1234567");

    let output = clearops(&tmp)
        .args(["show", &id, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["shipment"]["status"], "DRAFT");
    assert!(json["next_steps"].as_array().unwrap().len() >= 2);
}

#[test]
fn test_list_shows_active_shipments() {
    let tmp = setup_workspace();
    create_shipment(&tmp, "CO-1", "MSCU1234567");
    create_shipment(&tmp, "CO-1", "MAEU7654321");

    clearops(&tmp)
        .args(["list", "--company", "CO-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MSCU1234567"))
        .stdout(predicate::str::contains("MAEU7654321"));
}

#[test]
fn test_alerts_on_seeded_data() {
    let tmp = tempfile::TempDir::new().unwrap();
    clearops(&tmp).args(["init", "--seed"]).assert().success();

    // The seeded file on quay for 6 days without a DO produces alerts.
    let output = clearops(&tmp)
        .args(["alerts", "--company", "demo", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let feed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let feed = feed.as_array().unwrap();
    assert!(!feed.is_empty());
    assert!(feed
        .iter()
        .any(|a| a["id"].as_str().unwrap().ends_with(":demurrage")));
}

#[test]
fn test_alerts_empty_company() {
    let tmp = setup_workspace();
    clearops(&tmp)
        .args(["alerts", "--company", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No alerts"));
}

#[test]
fn test_terminal_fee_payment_advances_from_bae() {
    let tmp = setup_workspace();
    let id = create_shipment(&tmp, "CO-1", "MSCU1234567");
    add_document(&tmp, &id, "BAE");

    let output = clearops(&tmp)
        .args(["add-expense", &id, "ACCONAGE", "4000000"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let expense_id = stdout
        .split(['(', ')'])
        .find(|w| w.len() == 26 && w.chars().all(|c| c.is_ascii_alphanumeric()))
        .expect("expense id in output")
        .to_string();

    clearops(&tmp)
        .args(["pay-expense", &expense_id, "--shipment", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked paid"))
        .stdout(predicate::str::contains("TERMINAL_PAID"));
}

#[test]
fn test_duty_breakdown_output() {
    let tmp = setup_workspace();
    clearops(&tmp)
        .args(["duty", "100000000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DD"))
        .stdout(predicate::str::contains("TVA"))
        .stdout(predicate::str::contains("44960000"));
}

#[test]
fn test_show_unknown_shipment_fails() {
    let tmp = setup_workspace();
    clearops(&tmp)
        .args(["show", "01JZZZZZZZZZZZZZZZZZZZZZZZ"])
        .assert()
        .failure();
}
