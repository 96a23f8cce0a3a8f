pub mod config;
pub mod ipc;
#[cfg(unix)]
pub mod signal_handler;
pub mod stub;

pub use config::HarnessConfig;
pub use stub::StubRegistry;
