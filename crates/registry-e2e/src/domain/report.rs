//! Per-run verdicts and the suite report they aggregate into.

use serde::Deserialize;
use serde::Serialize;

use super::category::QueryCategory;
use super::payload::Payload;
use super::test_case::CaseKey;
use super::test_case::Expectation;

/// What the system under test actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observed {
    Success,
    Failure,
    /// Infrastructure trouble: no answer either way.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Passed,
    Failed,
    Errored,
}

impl Verdict {
    /// Compares an observed outcome against the fixture's expectation.
    pub fn judge(expected: Expectation, observed: Observed) -> Verdict {
        match (expected, observed) {
            (_, Observed::Error) => Verdict::Errored,
            (Expectation::Success, Observed::Success)
            | (Expectation::Failure, Observed::Failure) => Verdict::Passed,
            _ => Verdict::Failed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Passed => "passed",
            Verdict::Failed => "failed",
            Verdict::Errored => "errored",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseVerdict {
    pub category: QueryCategory,
    pub key: CaseKey,
    pub description: String,
    pub expected: Expectation,
    pub observed: Observed,
    pub verdict: Verdict,
    /// Payload and message are only kept for cases that did not pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl Counts {
    fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Passed => self.passed += 1,
            Verdict::Failed => self.failed += 1,
            Verdict::Errored => self.errored += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errored
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub category: QueryCategory,
    #[serde(flatten)]
    pub counts: Counts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub groups: Vec<GroupSummary>,
    pub verdicts: Vec<CaseVerdict>,
    pub aborted: bool,
}

impl SuiteReport {
    pub fn totals(&self) -> Counts {
        let mut counts = Counts::default();
        for verdict in &self.verdicts {
            counts.record(verdict.verdict);
        }
        counts
    }

    pub fn summary_for(&self, category: QueryCategory) -> Option<&GroupSummary> {
        self.groups.iter().find(|g| g.category == category)
    }

    /// True when every completed case passed and the run was not cut short.
    pub fn is_success(&self) -> bool {
        let totals = self.totals();
        !self.aborted && totals.failed == 0 && totals.errored == 0
    }

    pub fn find(&self, category: QueryCategory, key: &CaseKey) -> Option<&CaseVerdict> {
        self.verdicts
            .iter()
            .find(|v| v.category == category && &v.key == key)
    }
}

/// Collects verdicts for one worker; merged in canonical group order.
#[derive(Debug, Default)]
pub struct ReportAccumulator {
    verdicts: Vec<CaseVerdict>,
}

impl ReportAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, verdict: CaseVerdict) {
        self.verdicts.push(verdict);
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn merge(&mut self, other: ReportAccumulator) {
        self.verdicts.extend(other.verdicts);
    }

    /// Flags the report as aborted when fewer than `scheduled` cases completed.
    pub fn finish_partial(self, scheduled: usize) -> SuiteReport {
        let aborted = self.len() < scheduled;
        self.finish(aborted)
    }

    pub fn finish(self, aborted: bool) -> SuiteReport {
        let mut groups: Vec<GroupSummary> = Vec::new();
        for verdict in &self.verdicts {
            match groups.iter_mut().find(|g| g.category == verdict.category) {
                Some(group) => group.counts.record(verdict.verdict),
                None => {
                    let mut counts = Counts::default();
                    counts.record(verdict.verdict);
                    groups.push(GroupSummary {
                        category: verdict.category,
                        counts,
                    });
                }
            }
        }
        SuiteReport {
            groups,
            verdicts: self.verdicts,
            aborted,
        }
    }
}
