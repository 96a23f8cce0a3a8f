use serde::Deserialize;
use serde::Serialize;

use super::category::QueryCategory;
use super::content_type::ContentType;
use super::payload::Payload;

/// A single catalogue fixture.
///
/// Field names on the wire match the fixture files the catalogue was first
/// written in (`testName`, `testShouldFail`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(rename = "testName", default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "testShouldFail")]
    pub should_fail: bool,
    #[serde(rename = "testDescription")]
    pub description: String,
    #[serde(
        rename = "testContentType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<ContentType>,
    #[serde(rename = "testPayload", default)]
    pub payload: Payload,
}

impl TestCase {
    pub fn new(name: &str, should_fail: bool, description: &str) -> Self {
        Self {
            name: name.to_string(),
            should_fail,
            description: description.to_string(),
            content_type: None,
            payload: Payload::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn expectation(&self) -> Expectation {
        if self.should_fail {
            Expectation::Failure
        } else {
            Expectation::Success
        }
    }

    /// Reporting key: the name when present, otherwise the position in its group.
    pub fn key(&self, index: usize) -> CaseKey {
        if self.name.trim().is_empty() {
            CaseKey::Index(index)
        } else {
            CaseKey::Named(self.name.clone())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    Success,
    Failure,
}

impl Expectation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Expectation::Success => "success",
            Expectation::Failure => "failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaseKey {
    Named(String),
    Index(usize),
}

impl CaseKey {
    /// Whether a user-supplied selector (`name` or `#index`) refers to this key.
    pub fn matches(&self, selector: &str) -> bool {
        match self {
            CaseKey::Named(name) => name == selector,
            CaseKey::Index(index) => selector
                .strip_prefix('#')
                .and_then(|s| s.parse::<usize>().ok())
                .is_some_and(|i| i == *index),
        }
    }
}

impl std::fmt::Display for CaseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseKey::Named(name) => f.write_str(name),
            CaseKey::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// Ordered cases for one query category.
///
/// Each case remembers its position in the group it was first declared in, so
/// a selected subset still reports unnamed cases under their original index.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCaseGroup {
    category: QueryCategory,
    cases: Vec<TestCase>,
    positions: Vec<usize>,
}

impl TestCaseGroup {
    pub fn new(category: QueryCategory, cases: Vec<TestCase>) -> Self {
        let positions = (0..cases.len()).collect();
        Self {
            category,
            cases,
            positions,
        }
    }

    pub fn category(&self) -> QueryCategory {
        self.category
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (CaseKey, &TestCase)> {
        self.cases
            .iter()
            .zip(self.positions.iter())
            .map(|(case, position)| (case.key(*position), case))
    }

    pub(crate) fn retain_matching<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&CaseKey) -> bool,
    {
        let mut cases = Vec::new();
        let mut positions = Vec::new();
        for (case, position) in self.cases.iter().zip(self.positions.iter()) {
            if keep(&case.key(*position)) {
                cases.push(case.clone());
                positions.push(*position);
            }
        }
        Self {
            category: self.category,
            cases,
            positions,
        }
    }
}
