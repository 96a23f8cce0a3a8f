//! The read-only fixture catalogue.

mod error;
mod fixtures;
mod loader;

use std::collections::HashSet;
use std::sync::OnceLock;

pub use error::CatalogueError;

use crate::domain::category::QueryCategory;
use crate::domain::content_type::ContentType;
use crate::domain::test_case::TestCase;
use crate::domain::test_case::TestCaseGroup;

static BUILTIN: OnceLock<Catalogue> = OnceLock::new();

/// Immutable collection of fixture groups in canonical category order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    groups: Vec<TestCaseGroup>,
}

/// Restricts a catalogue to some groups and/or some case keys.
///
/// Empty lists select everything on that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    pub groups: Vec<QueryCategory>,
    pub cases: Vec<String>,
}

impl CaseFilter {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.cases.is_empty()
    }
}

impl Catalogue {
    /// The process-wide built-in catalogue.
    pub fn builtin() -> &'static Catalogue {
        BUILTIN.get_or_init(|| Catalogue::from_groups(fixtures::builtin_groups()))
    }

    /// Orders groups canonically; does not validate.
    pub(crate) fn from_groups(mut groups: Vec<TestCaseGroup>) -> Self {
        groups.sort_by_key(|group| group.category().ordinal());
        Self { groups }
    }

    pub fn groups(&self) -> &[TestCaseGroup] {
        &self.groups
    }

    /// Categories present, in canonical order.
    pub fn list_groups(&self) -> Vec<QueryCategory> {
        self.groups.iter().map(TestCaseGroup::category).collect()
    }

    pub fn group(&self, category: QueryCategory) -> Option<&TestCaseGroup> {
        self.groups.iter().find(|group| group.category() == category)
    }

    /// Cases for `category`; empty when the category is not in this catalogue.
    pub fn cases_for(&self, category: QueryCategory) -> &[TestCase] {
        self.group(category).map(TestCaseGroup::cases).unwrap_or(&[])
    }

    pub fn case_count(&self) -> usize {
        self.groups.iter().map(TestCaseGroup::len).sum()
    }

    /// A new catalogue holding only the cases `filter` selects.
    pub fn select(&self, filter: &CaseFilter) -> Catalogue {
        if filter.is_empty() {
            return self.clone();
        }
        let groups = self
            .groups
            .iter()
            .filter(|group| filter.groups.is_empty() || filter.groups.contains(&group.category()))
            .map(|group| {
                group.retain_matching(|key| {
                    filter.cases.is_empty() || filter.cases.iter().any(|sel| key.matches(sel))
                })
            })
            .filter(|group| !group.is_empty())
            .collect();
        Catalogue { groups }
    }

    /// Checks the data-integrity rules every catalogue must satisfy.
    pub fn validate(&self) -> Result<(), CatalogueError> {
        let mut seen_categories = HashSet::new();
        for group in &self.groups {
            let category = group.category();
            if !seen_categories.insert(category) {
                return Err(CatalogueError::DuplicateGroup(category));
            }
            if group.is_empty() {
                return Err(CatalogueError::EmptyGroup(category));
            }

            let mut names = HashSet::new();
            for (key, case) in group.entries() {
                if case.description.trim().is_empty() {
                    return Err(CatalogueError::EmptyDescription {
                        category,
                        key: key.to_string(),
                    });
                }
                if !case.name.is_empty() && !names.insert(case.name.as_str()) {
                    return Err(CatalogueError::DuplicateName {
                        category,
                        name: case.name.clone(),
                    });
                }
                if let Some(content_type) = case.content_type {
                    if category != QueryCategory::Provider {
                        return Err(CatalogueError::ContentTypeOutsideProvider {
                            category,
                            key: key.to_string(),
                        });
                    }
                    check_data_type(content_type, case, &key.to_string())?;
                }
            }
        }
        Ok(())
    }
}

fn check_data_type(
    content_type: ContentType,
    case: &TestCase,
    key: &str,
) -> Result<(), CatalogueError> {
    let Some(data_type) = case.payload.str_value("provider_data_type") else {
        return Ok(());
    };
    if ContentType::parse_data_type(data_type) == Some(content_type) {
        Ok(())
    } else {
        Err(CatalogueError::DataTypeMismatch {
            key: key.to_string(),
            content_type,
            data_type: data_type.to_string(),
        })
    }
}
