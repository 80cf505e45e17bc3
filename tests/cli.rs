/// Runs the vnflood_service binary and checks its exit statuses.
///
/// - 0 when at least one basin produced a forecast
/// - 1 when every configured basin failed
/// - 2 on a usage error
///
/// Run with: cargo test --test cli

use std::path::PathBuf;
use std::process::{Command, Output};

fn repo_file(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vnflood_service"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("VNFLOOD_LOG_FILE")
        .env_remove("VNFLOOD_BASINS_CONFIG")
        .output()
        .unwrap_or_else(|e| panic!("failed to launch binary: {}", e))
}

#[test]
fn test_sample_run_exits_zero_with_json_report() {
    let fixture = repo_file("data/rainfall_sample.json");
    let out = run(&[fixture.to_str().unwrap(), "--summary"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout should be JSON");
    assert_eq!(report["summaries"].as_array().map(|s| s.len()), Some(4));
    assert!(report.get("basins").is_none(), "--summary drops the per-day detail");
}

#[test]
fn test_every_basin_failing_exits_one() {
    // CN 120 is outside 30..=100, so every basin's runoff estimate fails.
    let config = std::env::temp_dir().join(format!("vnflood_cli_failing_{}.toml", std::process::id()));
    let body: String = ["HONG", "MEKONG", "DONGNAI", "CENTRAL"]
        .iter()
        .map(|code| format!("[[basin]]\ncode = \"{}\"\ncurve_number = 120.0\n\n", code))
        .collect();
    std::fs::write(&config, body).unwrap();

    let fixture = repo_file("data/rainfall_sample.json");
    let out = run(&[fixture.to_str().unwrap(), "--config", config.to_str().unwrap()]);
    let _ = std::fs::remove_file(&config);

    assert_eq!(out.status.code(), Some(1), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("report is still printed");
    assert_eq!(report["failures"].as_array().map(|f| f.len()), Some(4));
    assert_eq!(report["summaries"].as_array().map(|s| s.len()), Some(0));
}

#[test]
fn test_usage_error_exits_two() {
    let out = run(&["--verbose"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("usage:"));
}
