use thiserror::Error;

use crate::domain::CatalogueError;
use crate::domain::SuiteReport;
use crate::infra::ipc::ClientError;

/// Process exit codes, following sysexits.h where one fits.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    /// At least one case failed its expectation.
    pub const CASES_FAILED: i32 = 1;
    pub const USAGE: i32 = 64;
    pub const UNAVAILABLE: i32 = 69;
    /// No failures, but some cases errored.
    pub const TEMPFAIL: i32 = 75;
    pub const INTERRUPTED: i32 = 130;
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error("No cases match the given --group/--case selection")]
    EmptySelection,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Catalogue(_) | AppError::EmptySelection => exit_codes::USAGE,
            AppError::Client(ClientError::InvalidTarget { .. }) => exit_codes::USAGE,
            AppError::Client(_) => exit_codes::UNAVAILABLE,
            AppError::Signal(_) => exit_codes::CASES_FAILED,
        }
    }
}

/// Maps a finished run to its exit code.
///
/// Failures outrank errors: a run with both exits 1.
pub fn exit_code_for_report(report: &SuiteReport, interrupted: bool) -> i32 {
    if interrupted {
        return exit_codes::INTERRUPTED;
    }
    let totals = report.totals();
    if totals.failed > 0 {
        exit_codes::CASES_FAILED
    } else if totals.errored > 0 || report.aborted {
        exit_codes::TEMPFAIL
    } else {
        exit_codes::SUCCESS
    }
}
