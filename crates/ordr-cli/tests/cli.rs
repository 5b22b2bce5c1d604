use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Config file in `dir` with the usage counter kept inside it too.
fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.json");
    let usage_file = dir.join("api-usage.json");
    let config = serde_json::json!({"usage": {"file": usage_file}});
    fs::write(&path, config.to_string()).unwrap();
    path
}

fn ordr(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ordr").unwrap();
    for key in [
        "GOOGLE_CLOUD_API_KEY",
        "JUSO_API_KEY",
        "NAVER_CLIENT_ID",
        "NAVER_CLIENT_SECRET",
        "ORDER_DEFAULT_PHONE",
    ] {
        cmd.env_remove(key);
    }
    cmd.arg("-c").arg(config);
    cmd
}

#[test]
fn test_parse_text_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let input = dir.path().join("slip.txt");
    fs::write(&input, "서울특별시 강남구 테헤란로\n152\n010-1234-5678\nJohn Smith\n").unwrap();

    ordr(&config)
        .arg("parse")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name": "John Smith""#))
        .stdout(predicate::str::contains(r#""address": "서울특별시 강남구 테헤란로 152""#))
        .stdout(predicate::str::contains(r#""phone": "01012345678""#))
        .stdout(predicate::str::contains(r#""addressValid": true"#));
}

#[test]
fn test_parse_stdin_uses_default_phone() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    ordr(&config)
        .args(["parse", "-"])
        .write_stdin("대송4길\n80\nAnyeong")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""address": "대송4길 80""#))
        .stdout(predicate::str::contains(r#""phone": "01086100102""#));
}

#[test]
fn test_enrich_sentinel_is_not_looked_up() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    ordr(&config)
        .args(["enrich", "외국인"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""address": "외국인""#))
        .stdout(predicate::str::contains(r#""addressValid": false"#));
}

#[test]
fn test_export_csv_layout() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let records = dir.path().join("records.json");
    let output = dir.path().join("orders.csv");
    fs::write(
        &records,
        r#"[
            {"name":"John Smith","address":"서울특별시 강남구 테헤란로 152","phone":"01012345678","addressValid":true},
            {"name":"ERROR: b.jpg","address":"processing failed: boom","phone":null,"addressValid":false}
        ]"#,
    )
    .unwrap();

    ordr(&config)
        .arg("export")
        .arg(&records)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 records"));

    let csv = fs::read_to_string(&output).unwrap();
    assert_eq!(
        csv,
        "name,,address,phone\n\
         John Smith,,서울특별시 강남구 테헤란로 152,01012345678\n\
         ERROR: b.jpg,,processing failed: boom,\n"
    );
}

#[test]
fn test_export_skip_errors() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let records = dir.path().join("records.json");
    let output = dir.path().join("orders.csv");
    fs::write(
        &records,
        r#"[{"name":"ERROR: b.jpg","address":"processing failed: boom","addressValid":false}]"#,
    )
    .unwrap();

    ordr(&config)
        .arg("export")
        .arg(&records)
        .args(["--output"])
        .arg(&output)
        .arg("--skip-errors")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&output).unwrap(), "name,,address,phone\n");
}

#[test]
fn test_config_init_set_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.json");

    ordr(&config)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    ordr(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    ordr(&config)
        .args(["config", "set", "batch.max_concurrent_ocr", "5"])
        .assert()
        .success();

    ordr(&config)
        .args(["config", "get", "batch.max_concurrent_ocr"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));

    ordr(&config)
        .args(["config", "get", "batch.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_usage_starts_at_zero() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    ordr(&config)
        .arg("usage")
        .assert()
        .success()
        .stdout(predicate::str::contains("Calls:          0"))
        .stdout(predicate::str::contains("Free limit:     1000"));
}

#[test]
fn test_process_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    ordr(&config)
        .arg("process")
        .arg(dir.path().join("missing.jpg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_batch_without_matches() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let pattern = format!("{}/*.jpg", dir.path().display());

    ordr(&config)
        .args(["batch", pattern.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching images found"));
}

#[test]
fn test_batch_requires_api_key() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    fs::write(dir.path().join("a.jpg"), b"not really a jpeg").unwrap();
    let pattern = format!("{}/*.jpg", dir.path().display());

    ordr(&config)
        .args(["batch", pattern.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vision API key is not configured"));
}
