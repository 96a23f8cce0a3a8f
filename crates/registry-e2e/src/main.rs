//! CLI entrypoint for registry-e2e.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

use anyhow::Result;
use registry_e2e::Application;

fn main() -> Result<()> {
    let app = Application::new();
    let exit_code = app.run()?;
    std::process::exit(exit_code);
}
