use thiserror::Error;

use crate::domain::category::QueryCategory;
use crate::domain::content_type::ContentType;

/// Catalogue integrity errors. Any of these aborts loading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogueError {
    #[error("Unknown query category '{0}' in catalogue")]
    UnknownCategory(String),

    #[error("Group '{0}' appears more than once")]
    DuplicateGroup(QueryCategory),

    #[error("Group '{0}' has no test cases")]
    EmptyGroup(QueryCategory),

    #[error("Case {key} in '{category}' has an empty description")]
    EmptyDescription { category: QueryCategory, key: String },

    #[error("Case name '{name}' is used more than once in '{category}'")]
    DuplicateName { category: QueryCategory, name: String },

    #[error("Case {key} in '{category}' sets a content type, which only provider cases may do")]
    ContentTypeOutsideProvider { category: QueryCategory, key: String },

    #[error(
        "Case {key} declares content type '{content_type}' but provider_data_type is '{data_type}'"
    )]
    DataTypeMismatch {
        key: String,
        content_type: ContentType,
        data_type: String,
    },

    #[error("Catalogue must be a JSON object keyed by group name")]
    NotAnObject,

    #[error("Invalid catalogue JSON: {0}")]
    Json(String),

    #[error("Failed to read catalogue {path}: {reason}")]
    Io { path: String, reason: String },
}

impl From<serde_json::Error> for CatalogueError {
    fn from(err: serde_json::Error) -> Self {
        CatalogueError::Json(err.to_string())
    }
}
