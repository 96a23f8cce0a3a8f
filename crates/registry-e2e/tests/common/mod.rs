#![expect(dead_code, reason = "Test harness helpers are used selectively.")]

//! Shared helpers for integration tests.

pub mod mock_tool_server;
pub mod recording_system;

pub use mock_tool_server::MockToolServer;
pub use mock_tool_server::ToolBehavior;
pub use recording_system::RecordingSystem;

use assert_cmd::Command;
use std::path::PathBuf;

pub fn registry_e2e_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("registry-e2e"));
    for key in [
        "REGISTRY_E2E_SERVER",
        "REGISTRY_E2E_TCP_ADDR",
        "REGISTRY_E2E_TIMEOUT_SECS",
        "REGISTRY_E2E_STRICT",
        "REGISTRY_E2E_PARALLEL",
        "REGISTRY_E2E_LOG",
        "REGISTRY_E2E_LOG_FORMAT",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

pub fn binary_path() -> PathBuf {
    PathBuf::from(assert_cmd::cargo::cargo_bin!("registry-e2e"))
}

/// `--server` value that runs this binary's own stub tool server.
pub fn stub_server_command() -> String {
    let path = binary_path().display().to_string();
    format!("{} serve-stub", shell_words::quote(&path))
}
