use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// The six registry query categories, in canonical catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryCategory {
    Provider,
    ProviderDocs,
    SearchModules,
    ModuleDetails,
    SearchPolicies,
    PolicyDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown query category: '{0}'")]
pub struct UnknownCategory(pub String);

impl QueryCategory {
    pub const ALL: [QueryCategory; 6] = [
        QueryCategory::Provider,
        QueryCategory::ProviderDocs,
        QueryCategory::SearchModules,
        QueryCategory::ModuleDetails,
        QueryCategory::SearchPolicies,
        QueryCategory::PolicyDetails,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryCategory::Provider => "provider",
            QueryCategory::ProviderDocs => "providerDocs",
            QueryCategory::SearchModules => "searchModules",
            QueryCategory::ModuleDetails => "moduleDetails",
            QueryCategory::SearchPolicies => "searchPolicies",
            QueryCategory::PolicyDetails => "policyDetails",
        }
    }

    /// Tool invoked on a registry tool server for this category.
    pub fn tool_name(&self) -> &'static str {
        match self {
            QueryCategory::Provider => "resolveProviderDocID",
            QueryCategory::ProviderDocs => "getProviderDocs",
            QueryCategory::SearchModules => "searchModules",
            QueryCategory::ModuleDetails => "moduleDetails",
            QueryCategory::SearchPolicies => "searchPolicies",
            QueryCategory::PolicyDetails => "policyDetails",
        }
    }

    /// Inverse of [`QueryCategory::tool_name`].
    pub fn from_tool_name(name: &str) -> Option<QueryCategory> {
        QueryCategory::ALL
            .into_iter()
            .find(|category| category.tool_name() == name)
    }

    /// Position in the canonical group order.
    pub fn ordinal(&self) -> usize {
        match self {
            QueryCategory::Provider => 0,
            QueryCategory::ProviderDocs => 1,
            QueryCategory::SearchModules => 2,
            QueryCategory::ModuleDetails => 3,
            QueryCategory::SearchPolicies => 4,
            QueryCategory::PolicyDetails => 5,
        }
    }
}

impl std::str::FromStr for QueryCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl std::fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
