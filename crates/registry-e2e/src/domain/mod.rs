pub mod catalogue;
pub mod category;
pub mod content_type;
pub mod payload;
pub mod report;
pub mod test_case;

pub use catalogue::{CaseFilter, Catalogue, CatalogueError};
pub use category::{QueryCategory, UnknownCategory};
pub use content_type::ContentType;
pub use payload::{Payload, PayloadValue};
pub use report::{
    CaseVerdict, Counts, GroupSummary, Observed, ReportAccumulator, SuiteReport, Verdict,
};
pub use test_case::{CaseKey, Expectation, TestCase, TestCaseGroup};
