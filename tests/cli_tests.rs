//! Integration tests for the er-finder CLI

use std::path::PathBuf;
use std::process::{Command, Output};

const SEOUL_CSV: &str = "\
기관명,주소,병원분류명,병원위도,병원경도,대표전화1,응급실전화,응급실운영여부
서울대학교병원,서울특별시 종로구 대학로 101,상급종합,37.5796,126.9990,1588-5700,02-2072-2473,1
강북삼성병원,서울특별시 종로구 새문안로 29,종합,37.5684,126.9679,1599-8114,02-2001-1000,1
적십자병원,서울특별시 종로구 새문안로 9,종합,37.5670,126.9670,02-2002-8000,02-2002-8888,1
중앙대학교병원,서울특별시 동작구 흑석로 102,상급종합,37.5070,126.9610,1800-1114,02-6299-1339,1
";

/// Write the facility slice to a per-test file and return its path
fn write_csv(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "er-finder-cli-{}-{name}.csv",
        std::process::id()
    ));
    std::fs::write(&path, SEOUL_CSV).expect("Failed to write test CSV");
    path
}

/// Run the binary against `csv`, ignoring any config file on the machine
fn run_cli(csv: &PathBuf, args: &[&str]) -> Output {
    let missing_config = std::env::temp_dir().join("er-finder-cli-no-config.toml");
    Command::new(env!("CARGO_BIN_EXE_er-finder"))
        .arg("--config")
        .arg(&missing_config)
        .args(args)
        .env("ER_FINDER_DATA__CSV_PATH", csv)
        .env("ER_FINDER_DATA__ENCODING", "utf-8")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_er-finder"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nearby emergency room dashboard"));
    assert!(stdout.contains("search"));
    assert!(stdout.contains("serve"));
}

#[test]
fn test_search_prints_cards_and_counts() {
    let csv = write_csv("search");
    let output = run_cli(
        &csv,
        &["search", "--lat", "37.5665", "--lon", "126.978", "--radius", "5"],
    );
    std::fs::remove_file(&csv).ok();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("within 5 km of 37.566500, 126.978000"));

    let first = stdout.find("강북삼성병원").expect("missing nearest card");
    let second = stdout.find("적십자병원").expect("missing second card");
    let third = stdout.find("서울대학교병원").expect("missing third card");
    assert!(first < second && second < third);
    assert!(stdout.contains("02-2001-1000"));
    assert!(!stdout.contains("중앙대학교병원"));

    assert!(stdout.contains("상급종합: 1"));
    assert!(stdout.contains("종합: 2"));
    assert!(stdout.contains("All 3 matches"));
}

#[test]
fn test_search_with_category_filter() {
    let csv = write_csv("category");
    let output = run_cli(
        &csv,
        &["search", "--radius", "20", "--category", "상급종합"],
    );
    std::fs::remove_file(&csv).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("서울대학교병원"));
    assert!(stdout.contains("중앙대학교병원"));
    assert!(!stdout.contains("강북삼성병원"));
    assert!(stdout.contains("All 2 matches"));
}

#[test]
fn test_search_rejects_radius_below_minimum() {
    let csv = write_csv("radius");
    let output = run_cli(&csv, &["search", "--radius", "0.5"]);
    std::fs::remove_file(&csv).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid input"), "stderr: {stderr}");
    assert!(!stderr.contains("Error: Invalid input"), "stderr: {stderr}");
}
