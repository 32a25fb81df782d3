//! Integration tests for the evalview CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn evalview(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("evalview").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

/// Corpus with two documents, one malformed file and one non-JSON file
fn corpus() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    fs::create_dir_all(data.join("batch_2")).unwrap();

    fs::write(
        data.join("case_a.json"),
        r#"{
            "uid": "x1",
            "scene": {"env": "prod", "region": "us"},
            "prompt": "What is the capital of France?",
            "rubrics": [
                {"label": "a", "weight": 2, "model1_judgement": {"score": 1, "reason": "correct"}},
                {"label": "b", "weight": 3, "model1_judgement": {"score": 0, "reason": "missing"}},
                {"weight": 1}
            ]
        }"#,
    )
    .unwrap();
    fs::write(
        data.join("batch_2/case_b.json"),
        r#"{"uid": "x2", "rubrics": [{"label": "a", "weight": 4}]}"#,
    )
    .unwrap();
    fs::write(data.join("broken.json"), r#"{"uid": "x3", "rub"#).unwrap();
    fs::write(data.join("readme.txt"), "not a document").unwrap();

    temp_dir
}

#[test]
fn test_cli_help() {
    let temp_dir = TempDir::new().unwrap();
    evalview(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_cli_version() {
    let temp_dir = TempDir::new().unwrap();
    evalview(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("evalview"));

    evalview(temp_dir.path())
        .args(["version", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rust Edition"));
}

#[test]
fn test_invalid_subcommand() {
    let temp_dir = TempDir::new().unwrap();
    evalview(temp_dir.path())
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_scan_text_summary() {
    let temp_dir = corpus();
    evalview(temp_dir.path())
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 JSON files"))
        .stdout(predicate::str::contains("batch_2/case_b.json"))
        .stdout(predicate::str::contains("broken.json"))
        .stdout(predicate::str::contains("readme.txt").not())
        .stdout(predicate::str::contains("Rubrics: 4"))
        .stdout(predicate::str::contains("Total weight: 10"))
        .stdout(predicate::str::contains("• a: 2"));
}

#[test]
fn test_scan_explicit_root_with_exclude() {
    let temp_dir = corpus();
    evalview(temp_dir.path())
        .args(["scan", "data", "--exclude", "batch_2/**", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("case_b.json").not())
        .stdout(predicate::str::contains("\"total_rubrics\": 3"));
}

#[test]
fn test_exclude_keeps_brace_globs_whole() {
    let temp_dir = corpus();
    evalview(temp_dir.path())
        .args([
            "scan",
            "data",
            "--exclude",
            "{batch_2,archive}/**",
            "--exclude",
            "broken.json",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("case_b.json").not())
        .stdout(predicate::str::contains("broken.json").not())
        .stdout(predicate::str::contains("\"total\": 1"));
}

#[test]
fn test_scan_missing_root_fails() {
    let temp_dir = TempDir::new().unwrap();
    evalview(temp_dir.path())
        .args(["scan", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_scan_empty_root_warns() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("data")).unwrap();
    evalview(temp_dir.path())
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("No JSON files found"));
}

#[test]
fn test_stats_json() {
    let temp_dir = corpus();
    let assert = evalview(temp_dir.path())
        .args(["stats", "--format", "json", "--mode", "parallel"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["summary"]["total"], 3);
    assert_eq!(value["summary"]["failed"], 1);
    assert_eq!(value["aggregate"]["total_rubrics"], 4);
    assert_eq!(value["aggregate"]["total_weight"], 10.0);
    assert_eq!(value["aggregate"]["label_distribution"]["a"], 2);
    assert_eq!(value["aggregate"]["label_distribution"]["b"], 1);
    assert_eq!(value["judgement_summary"]["model1"]["judged"], 2);
    assert_eq!(value["judgement_summary"]["model1"]["passed"], 1);
}

#[test]
fn test_show_by_index_and_path() {
    let temp_dir = corpus();
    // Sorted listing: batch_2/case_b.json, broken.json, case_a.json
    evalview(temp_dir.path())
        .args(["show", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("case_a.json"))
        .stdout(predicate::str::contains("• env: prod"))
        .stdout(predicate::str::contains("Evaluation (3 rubrics)"))
        .stdout(predicate::str::contains("Model1 score"))
        .stdout(predicate::str::contains("Reason: correct"));

    evalview(temp_dir.path())
        .args(["show", "batch_2/case_b.json", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"uid\": \"x2\""));
}

#[test]
fn test_show_broken_document_reports_error() {
    let temp_dir = corpus();
    evalview(temp_dir.path())
        .args(["show", "broken.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("JSON decode error"));
}

#[test]
fn test_show_invalid_index() {
    let temp_dir = corpus();
    evalview(temp_dir.path())
        .args(["show", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid selection 9"));
}

#[test]
fn test_html_report_written() {
    let temp_dir = corpus();
    evalview(temp_dir.path())
        .args(["html", "--output", "out/report.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("out/report.html"));

    let html = fs::read_to_string(temp_dir.path().join("out/report.html")).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("case_a.json"));
}

#[test]
fn test_config_show_formats() {
    let temp_dir = TempDir::new().unwrap();
    evalview(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[scanner]"));

    evalview(temp_dir.path())
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"metadata_fields\""));
}

#[test]
fn test_repository_config_and_env_override() {
    let temp_dir = corpus();
    fs::write(
        temp_dir.path().join("evalview.toml"),
        "[scanner]\nroot = \"data/batch_2\"\n",
    )
    .unwrap();

    evalview(temp_dir.path())
        .args(["stats", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_weight\": 4.0"));

    evalview(temp_dir.path())
        .env("EVALVIEW_REPORT__TITLE", "Nightly evals")
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nightly evals"));
}

#[test]
fn test_custom_config_file() {
    let temp_dir = corpus();
    let config_path = temp_dir.path().join("custom.yaml");
    fs::write(&config_path, "batch:\n  mode: sequential\n").unwrap();

    evalview(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["config", "show", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sequential"));
}
