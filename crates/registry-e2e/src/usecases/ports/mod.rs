pub mod errors;
#[cfg(test)]
pub(crate) mod test_support;

pub use errors::SutError;
pub use system_under_test::{QueryOutcome, SystemUnderTest, SystemUnderTestHandle};
