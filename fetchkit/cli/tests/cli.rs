use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    cargo_bin_cmd!("fetchkit")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("transformer pipeline"))
        .stdout(predicate::str::contains("--retry"))
        .stdout(predicate::str::contains("--cache-ms"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("fetchkit")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetchkit"));
}

// ============================================================================
// Argument Errors
// ============================================================================

#[test]
fn test_missing_url() {
    cargo_bin_cmd!("fetchkit")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<URL>"));
}

#[test]
fn test_malformed_header() {
    cargo_bin_cmd!("fetchkit")
        .args(["https://example.com", "-H", "no-colon-here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME: VALUE"));
}

#[test]
fn test_malformed_query() {
    cargo_bin_cmd!("fetchkit")
        .args(["https://example.com", "-q", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

// ============================================================================
// Runtime Errors (no network)
// ============================================================================

#[test]
fn test_invalid_json_body() {
    cargo_bin_cmd!("fetchkit")
        .args(["https://example.com", "-d", "{oops", "--json-body"])
        .env_remove("RUST_LOG")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: --data is not valid JSON"));
}

#[test]
fn test_relative_url_without_prefix() {
    cargo_bin_cmd!("fetchkit")
        .arg("/just/a/path")
        .env_remove("FETCHKIT_PREFIX")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}
