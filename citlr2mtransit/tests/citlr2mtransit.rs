use assert_cmd::prelude::*;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_citlr2mtransit() {
    let output_dir = TempDir::new().expect("create temp dir failed");
    Command::cargo_bin("citlr2mtransit")
        .expect("Failed to find binary 'citlr2mtransit'")
        .arg("../tests/fixtures/citlr")
        .arg(output_dir.path().to_str().unwrap())
        .arg("ca_le_richelain_citlr_bus_")
        .arg("--current-date")
        .arg("20240115")
        .assert()
        .success();
    for file in &[
        "agency.txt",
        "routes.txt",
        "trips.txt",
        "stops.txt",
        "trip_stops.txt",
        "service_dates.txt",
    ] {
        assert!(output_dir
            .path()
            .join(format!("ca_le_richelain_citlr_bus_{}", file))
            .is_file());
    }
}

#[test]
fn test_citlr2mtransit_create_output_directory() {
    let output_dir = TempDir::new().expect("create temp dir failed");
    let unexisting_dir = output_dir.path().join("unexisting-folder");
    Command::cargo_bin("citlr2mtransit")
        .expect("Failed to find binary 'citlr2mtransit'")
        .arg("../tests/fixtures/citlr")
        .arg(unexisting_dir.to_str().unwrap())
        .arg("--current-date")
        .arg("20240115")
        .assert()
        .success();
    assert!(unexisting_dir.join("routes.txt").is_file());
}

#[test]
fn test_citlr2mtransit_with_config() {
    let output_dir = TempDir::new().expect("create temp dir failed");
    let config = output_dir.path().join("config.json");
    std::fs::write(
        &config,
        r#"{"files_prefix": "citlr_", "reference_date": "20240115"}"#,
    )
    .unwrap();
    let output = output_dir.path().join("output");
    Command::cargo_bin("citlr2mtransit")
        .expect("Failed to find binary 'citlr2mtransit'")
        .arg("../tests/fixtures/citlr")
        .arg(output.to_str().unwrap())
        .arg("--config")
        .arg(config.to_str().unwrap())
        .assert()
        .success();
    assert!(output.join("citlr_trips.txt").is_file());
}

#[test]
fn test_citlr2mtransit_nothing_after_last_service() {
    let output_dir = TempDir::new().expect("create temp dir failed");
    let output = output_dir.path().join("output");
    Command::cargo_bin("citlr2mtransit")
        .expect("Failed to find binary 'citlr2mtransit'")
        .arg("../tests/fixtures/citlr")
        .arg(output.to_str().unwrap())
        .arg("--current-date")
        .arg("20240201")
        .assert()
        .success();
    assert!(!output.exists());
}

#[test]
fn test_citlr2mtransit_invalid_input() {
    let output_dir = TempDir::new().expect("create temp dir failed");
    Command::cargo_bin("citlr2mtransit")
        .expect("Failed to find binary 'citlr2mtransit'")
        .arg("../tests/fixtures/i_m_not_here")
        .arg(output_dir.path().to_str().unwrap())
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_citlr2mtransit_invalid_date() {
    let output_dir = TempDir::new().expect("create temp dir failed");
    Command::cargo_bin("citlr2mtransit")
        .expect("Failed to find binary 'citlr2mtransit'")
        .arg("../tests/fixtures/citlr")
        .arg(output_dir.path().to_str().unwrap())
        .arg("--current-date")
        .arg("2024-01-15")
        .assert()
        .failure();
}
