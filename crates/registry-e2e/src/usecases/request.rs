//! Category-specific views over a fixture payload.

use serde_json::Value;

use crate::domain::Payload;
use crate::domain::PayloadValue;
use crate::domain::QueryCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyKind {
    Text,
    Integer,
}

/// Keys each category's operation defines, with the type it expects.
fn defined_keys(category: QueryCategory) -> &'static [(&'static str, KeyKind)] {
    match category {
        QueryCategory::Provider => &[
            ("provider_name", KeyKind::Text),
            ("provider_namespace", KeyKind::Text),
            ("provider_version", KeyKind::Text),
            ("provider_data_type", KeyKind::Text),
            ("service_slug", KeyKind::Text),
        ],
        QueryCategory::ProviderDocs => &[("provider_doc_id", KeyKind::Text)],
        QueryCategory::SearchModules => &[
            ("module_query", KeyKind::Text),
            ("current_offset", KeyKind::Integer),
        ],
        QueryCategory::ModuleDetails => &[("module_id", KeyKind::Text)],
        QueryCategory::SearchPolicies => &[("policy_query", KeyKind::Text)],
        QueryCategory::PolicyDetails => &[("terraform_policy_id", KeyKind::Text)],
    }
}

/// Typed fields of one query. A key that is missing or has the wrong type is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryView<'a> {
    Provider {
        name: Option<&'a str>,
        namespace: Option<&'a str>,
        version: Option<&'a str>,
        data_type: Option<&'a str>,
        service_slug: Option<&'a str>,
    },
    ProviderDocs {
        doc_id: Option<&'a str>,
    },
    SearchModules {
        query: Option<&'a str>,
        offset: Option<i64>,
    },
    ModuleDetails {
        module_id: Option<&'a str>,
    },
    SearchPolicies {
        query: Option<&'a str>,
    },
    PolicyDetails {
        policy_id: Option<&'a str>,
    },
}

/// A payload paired with its category's typed view. The payload itself is
/// never rewritten; `arguments` returns it exactly as loaded.
#[derive(Debug, Clone)]
pub struct QueryRequest<'a> {
    category: QueryCategory,
    view: QueryView<'a>,
    payload: &'a Payload,
}

impl<'a> QueryRequest<'a> {
    pub fn build(category: QueryCategory, payload: &'a Payload) -> Self {
        let text = |key: &'static str| payload.str_value(key);
        let view = match category {
            QueryCategory::Provider => QueryView::Provider {
                name: text("provider_name"),
                namespace: text("provider_namespace"),
                version: text("provider_version"),
                data_type: text("provider_data_type"),
                service_slug: text("service_slug"),
            },
            QueryCategory::ProviderDocs => QueryView::ProviderDocs {
                doc_id: text("provider_doc_id"),
            },
            QueryCategory::SearchModules => QueryView::SearchModules {
                query: text("module_query"),
                offset: payload.int_value("current_offset"),
            },
            QueryCategory::ModuleDetails => QueryView::ModuleDetails {
                module_id: text("module_id"),
            },
            QueryCategory::SearchPolicies => QueryView::SearchPolicies {
                query: text("policy_query"),
            },
            QueryCategory::PolicyDetails => QueryView::PolicyDetails {
                policy_id: text("terraform_policy_id"),
            },
        };
        Self {
            category,
            view,
            payload,
        }
    }

    pub fn category(&self) -> QueryCategory {
        self.category
    }

    pub fn view(&self) -> &QueryView<'a> {
        &self.view
    }

    pub fn payload(&self) -> &'a Payload {
        self.payload
    }

    pub fn tool_name(&self) -> &'static str {
        self.category.tool_name()
    }

    pub fn arguments(&self) -> Value {
        self.payload.to_json()
    }

    /// Defined keys present with a type other than the one the category expects.
    pub fn mistyped_keys(&self) -> Vec<&'a str> {
        defined_keys(self.category)
            .iter()
            .filter_map(|(key, kind)| {
                let (stored, value) = self.payload.iter().find(|(k, _)| k == key)?;
                let well_typed = matches!(
                    (kind, value),
                    (KeyKind::Text, PayloadValue::String(_))
                        | (KeyKind::Integer, PayloadValue::Integer(_))
                );
                (!well_typed).then_some(stored)
            })
            .collect()
    }

    /// Keys the category does not define; they are forwarded as-is.
    pub fn extra_keys(&self) -> Vec<&'a str> {
        let defined = defined_keys(self.category);
        self.payload
            .keys()
            .filter(|key| !defined.iter().any(|(k, _)| k == key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_view_reads_text_fields() {
        let payload = Payload::new()
            .with("provider_name", "aws")
            .with("service_slug", "aws_s3_bucket");
        let request = QueryRequest::build(QueryCategory::Provider, &payload);
        assert_eq!(
            request.view(),
            &QueryView::Provider {
                name: Some("aws"),
                namespace: None,
                version: None,
                data_type: None,
                service_slug: Some("aws_s3_bucket"),
            }
        );
        assert_eq!(request.tool_name(), "resolveProviderDocID");
    }

    #[test]
    fn test_wrongly_typed_offset_is_absent_but_forwarded() {
        let payload = Payload::new()
            .with("module_query", "aws")
            .with("current_offset", "ten");
        let request = QueryRequest::build(QueryCategory::SearchModules, &payload);
        assert_eq!(
            request.view(),
            &QueryView::SearchModules {
                query: Some("aws"),
                offset: None,
            }
        );
        assert_eq!(request.mistyped_keys(), vec!["current_offset"]);
        assert_eq!(request.arguments()["current_offset"], "ten");
    }

    #[test]
    fn test_extra_keys_survive_in_arguments() {
        let payload = Payload::new()
            .with("provider_doc_id", "8894603")
            .with("x_trace", json!({"nested": [1, 2]}));
        let request = QueryRequest::build(QueryCategory::ProviderDocs, &payload);
        assert_eq!(request.extra_keys(), vec!["x_trace"]);
        assert_eq!(request.arguments()["x_trace"], json!({"nested": [1, 2]}));
        assert!(request.mistyped_keys().is_empty());
    }

    #[test]
    fn test_empty_payload_builds_empty_view() {
        let payload = Payload::new();
        let request = QueryRequest::build(QueryCategory::PolicyDetails, &payload);
        assert_eq!(request.view(), &QueryView::PolicyDetails { policy_id: None });
        assert_eq!(request.arguments(), json!({}));
    }
}
