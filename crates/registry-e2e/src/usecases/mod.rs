mod harness;
mod request;

pub use harness::{
    AbortHandle, DEFAULT_CASE_TIMEOUT, RunOptions, RunSuiteUseCase, RunSuiteUseCaseImpl, run,
};
pub use request::{QueryRequest, QueryView};
pub mod ports;
