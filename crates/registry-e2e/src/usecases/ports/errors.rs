use std::time::Duration;

use thiserror::Error;

/// Infrastructure trouble talking to the system under test.
///
/// None of these say anything about whether a query was valid, so a case
/// that ends in one of them is errored rather than failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SutError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("No response within {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("System under test unavailable: {0}")]
    Unavailable(String),
}

impl SutError {
    pub fn kind(&self) -> &'static str {
        match self {
            SutError::Transport(_) => "transport",
            SutError::Timeout(_) => "timeout",
            SutError::MalformedResponse(_) => "malformed_response",
            SutError::Unavailable(_) => "unavailable",
        }
    }
}
