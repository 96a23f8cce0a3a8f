#![expect(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

//! CLI smoke tests.

mod common;

use common::MockToolServer;
use common::ToolBehavior;
use common::registry_e2e_cmd;
use common::stub_server_command;
use predicates::prelude::*;
use serde_json::Value;

const EXIT_FAILED: i32 = 1;
const EXIT_USAGE: i32 = 64;
const EXIT_UNAVAILABLE: i32 = 69;
const EXIT_TEMPFAIL: i32 = 75;

fn write_catalogue(dir: &tempfile::TempDir, contents: &str) -> String {
    let path = dir.path().join("catalogue.json");
    std::fs::write(&path, contents).unwrap();
    path.display().to_string()
}

#[test]
fn smoke_run_stub_passes() {
    registry_e2e_cmd()
        .args(["run", "--stub"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS  provider hashicorp_without_namespace"))
        .stdout(predicate::str::contains("Total: 48 cases: 48 passed, 0 failed, 0 errored"));
}

#[test]
fn smoke_run_defaults_to_stub() {
    registry_e2e_cmd()
        .args(["run", "--group", "policyDetails"])
        .assert()
        .success()
        .stdout(predicate::str::contains("policyDetails"));
}

#[test]
fn smoke_run_json_report() {
    let output = registry_e2e_cmd()
        .args(["--json", "run", "--stub", "--parallel"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["aborted"], false);
    assert_eq!(report["verdicts"].as_array().unwrap().len(), 48);
    assert_eq!(report["groups"][1]["category"], "providerDocs");
}

#[test]
fn smoke_verbose_logs_stay_off_stdout() {
    let output = registry_e2e_cmd()
        .env("REGISTRY_E2E_LOG_FORMAT", "json")
        .args(["-v", "--json", "run", "--group", "provider"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["verdicts"].as_array().unwrap().len(), 14);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.lines().any(|line| line.starts_with('{')));
}

#[test]
fn smoke_log_file_receives_records() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("harness.log");
    registry_e2e_cmd()
        .env("REGISTRY_E2E_LOG", &log_path)
        .args(["-v", "run", "--group", "policyDetails"])
        .assert()
        .success();
    let logged = std::fs::read_to_string(&log_path).unwrap();
    assert!(!logged.is_empty());
}

#[test]
fn smoke_run_selected_case() {
    registry_e2e_cmd()
        .args(["run", "--group", "searchPolicies", "--case", "#1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1 cases"));
}

#[test]
fn smoke_run_over_stdio_server() {
    let server = stub_server_command();
    registry_e2e_cmd()
        .args(["run", "--server", server.as_str(), "--group", "providerDocs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS  providerDocs valid_doc_id"));
}

#[test]
fn smoke_run_server_from_env() {
    registry_e2e_cmd()
        .env("REGISTRY_E2E_SERVER", stub_server_command())
        .args(["run", "--group", "moduleDetails"])
        .assert()
        .success();
}

#[test]
fn smoke_run_over_tcp() {
    let server = MockToolServer::start();
    registry_e2e_cmd()
        .args(["run", "--tcp", server.addr().as_str()])
        .assert()
        .success();
    assert_eq!(server.tool_calls().len(), 48);
}

#[test]
fn smoke_run_errored_cases_exit_tempfail() {
    let server = MockToolServer::start();
    server.set_behavior("searchModules", ToolBehavior::Hang);
    registry_e2e_cmd()
        .args([
            "run",
            "--tcp",
            server.addr().as_str(),
            "--group",
            "searchModules",
            "--case",
            "negative_offset",
            "--timeout",
            "1",
        ])
        .assert()
        .code(EXIT_TEMPFAIL)
        .stdout(predicate::str::contains("ERROR searchModules negative_offset"))
        .stdout(predicate::str::contains("observed error"));
}

#[test]
fn smoke_run_failed_case_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_catalogue(
        &dir,
        r#"{"providerDocs": [{
            "testName": "absent_doc",
            "testShouldFail": false,
            "testDescription": "Doc id missing from the index",
            "testPayload": {"provider_doc_id": "3356809"}
        }]}"#,
    );
    registry_e2e_cmd()
        .args(["run", "--catalogue", path.as_str()])
        .assert()
        .code(EXIT_FAILED)
        .stdout(predicate::str::contains("FAIL  providerDocs absent_doc"))
        .stdout(predicate::str::contains("expected success, observed failure"));
}

#[test]
fn smoke_unknown_group_in_catalogue_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_catalogue(&dir, r#"{"providers": []}"#);
    registry_e2e_cmd()
        .args(["run", "--catalogue", path.as_str()])
        .assert()
        .code(EXIT_USAGE)
        .stderr(predicate::str::contains("Unknown query category 'providers'"));
}

#[test]
fn smoke_bad_arguments_are_usage_errors() {
    registry_e2e_cmd()
        .args(["run", "--group", "modules"])
        .assert()
        .code(EXIT_USAGE);
    registry_e2e_cmd()
        .args(["run", "--case", "no_such_case"])
        .assert()
        .code(EXIT_USAGE)
        .stderr(predicate::str::contains("No cases match"));
    registry_e2e_cmd()
        .args(["run", "--server", ""])
        .assert()
        .code(EXIT_USAGE);
}

#[test]
fn smoke_unreachable_server_is_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    registry_e2e_cmd()
        .args(["run", "--tcp", addr.as_str()])
        .assert()
        .code(EXIT_UNAVAILABLE);
    registry_e2e_cmd()
        .args(["run", "--server", "registry-e2e-no-such-binary-xyz"])
        .assert()
        .code(EXIT_UNAVAILABLE);
}

#[test]
fn smoke_list_group() {
    registry_e2e_cmd()
        .args(["list", "--group", "providerDocs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tool getProviderDocs"))
        .stdout(predicate::str::contains("incorrect_numeric_doc_id"))
        .stdout(predicate::str::contains("searchModules").not());
}

#[test]
fn smoke_no_color_env_values_are_accepted() {
    for value in ["1", "true", ""] {
        registry_e2e_cmd()
            .env("NO_COLOR", value)
            .args(["list", "--group", "policyDetails"])
            .assert()
            .success()
            .stdout(predicate::str::contains("tool policyDetails"))
            .stdout(predicate::str::contains("\x1b[").not());
    }
}

#[test]
fn smoke_export_is_loadable_json() {
    let output = registry_e2e_cmd().arg("export").output().unwrap();
    assert!(output.status.success());
    let exported: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(exported.as_object().unwrap().len(), 6);

    let dir = tempfile::tempdir().unwrap();
    let path = write_catalogue(&dir, &String::from_utf8(output.stdout).unwrap());
    registry_e2e_cmd()
        .args(["run", "--catalogue", path.as_str()])
        .assert()
        .success();
}

#[test]
fn smoke_completions() {
    registry_e2e_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("registry-e2e"));
}

#[test]
fn smoke_help_and_version() {
    registry_e2e_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve-stub"));
    registry_e2e_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
