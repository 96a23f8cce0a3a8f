//! Harness configuration.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::usecases::AbortHandle;
use crate::usecases::DEFAULT_CASE_TIMEOUT;
use crate::usecases::RunOptions;

pub const ENV_TIMEOUT_SECS: &str = "REGISTRY_E2E_TIMEOUT_SECS";
pub const ENV_STRICT: &str = "REGISTRY_E2E_STRICT";
pub const ENV_PARALLEL: &str = "REGISTRY_E2E_PARALLEL";
pub const ENV_SERVER: &str = "REGISTRY_E2E_SERVER";
pub const ENV_TCP_ADDR: &str = "REGISTRY_E2E_TCP_ADDR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    timeout: Duration,
    strict: bool,
    parallel: bool,
    server_command: Option<String>,
    tcp_addr: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl HarnessConfig {
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn server_command(&self) -> Option<&str> {
        self.server_command.as_deref()
    }

    pub fn tcp_addr(&self) -> Option<&str> {
        self.tcp_addr.as_deref()
    }

    pub fn from_env() -> Self {
        Self {
            timeout: Duration::from_secs(parse_env_secs(
                ENV_TIMEOUT_SECS,
                DEFAULT_CASE_TIMEOUT.as_secs(),
            )),
            strict: parse_env_bool(ENV_STRICT, false),
            parallel: parse_env_bool(ENV_PARALLEL, false),
            server_command: parse_env_string(ENV_SERVER),
            tcp_addr: parse_env_string(ENV_TCP_ADDR),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_server_command(mut self, command: impl Into<String>) -> Self {
        self.server_command = Some(command.into());
        self
    }

    pub fn with_tcp_addr(mut self, addr: impl Into<String>) -> Self {
        self.tcp_addr = Some(addr.into());
        self
    }

    pub fn run_options(&self, abort: AbortHandle) -> RunOptions {
        RunOptions::default()
            .with_timeout(self.timeout)
            .with_strict(self.strict)
            .with_parallel(self.parallel)
            .with_abort_handle(abort)
    }
}

fn parse_env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Seconds; zero is rejected since every call needs a bound.
fn parse_env_secs(key: &str, default: u64) -> u64 {
    let Some(value) = parse_env_string(key) else {
        return default;
    };
    match value.parse::<u64>() {
        Ok(parsed) if parsed > 0 => parsed,
        _ => {
            warn!(value = %value, key, "Invalid timeout config; using default");
            default
        }
    }
}

fn parse_env_bool(key: &str, default: bool) -> bool {
    let Some(value) = parse_env_string(key) else {
        return default;
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(value = %value, key, "Invalid boolean config; using default");
            default
        }
    }
}
