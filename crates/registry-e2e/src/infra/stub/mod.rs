//! Deterministic in-process registry.
//!
//! Answers every query category from a small fixed index with the same
//! acceptance rules as the live registry, including its quirks: a
//! HashiCorp-owned provider queried under a wrong namespace still resolves,
//! and only ids present in the index are valid documentation ids.

mod registry_index;

use serde_json::Value;
use serde_json::json;
use tracing::debug;

use crate::domain::ContentType;
use crate::domain::Payload;
use crate::domain::QueryCategory;
use crate::usecases::QueryRequest;
use crate::usecases::QueryView;
use crate::usecases::ports::QueryOutcome;
use crate::usecases::ports::SutError;
use crate::usecases::ports::SystemUnderTest;

use registry_index::HASHICORP_NAMESPACE;
use registry_index::MODULES;
use registry_index::ModuleEntry;
use registry_index::POLICIES;
use registry_index::PROVIDERS;
use registry_index::ProviderEntry;

const PAGE_SIZE: usize = 10;
const LATEST: &str = "latest";

type Lookup = Result<Value, String>;

#[derive(Debug, Clone, Copy, Default)]
pub struct StubRegistry;

impl StubRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Answers one query. Rejections come back as `ok == false`, never as errors.
    pub fn answer(&self, category: QueryCategory, payload: &Payload) -> QueryOutcome {
        let request = QueryRequest::build(category, payload);
        let lookup = match *request.view() {
            QueryView::Provider {
                name,
                namespace,
                version,
                data_type,
                service_slug,
            } => resolve_provider(name, namespace, version, data_type, service_slug),
            QueryView::ProviderDocs { doc_id } => provider_docs(doc_id),
            QueryView::SearchModules { query, offset } => {
                search_modules(query, offset, payload.contains_key("current_offset"))
            }
            QueryView::ModuleDetails { module_id } => module_details(module_id),
            QueryView::SearchPolicies { query } => search_policies(query),
            QueryView::PolicyDetails { policy_id } => policy_details(policy_id),
        };

        match lookup {
            Ok(data) => QueryOutcome::success(data),
            Err(message) => {
                debug!(category = %category, error = %message, "Stub registry rejected query");
                QueryOutcome::failure(message)
            }
        }
    }
}

impl SystemUnderTest for StubRegistry {
    fn execute(
        &self,
        category: QueryCategory,
        payload: &Payload,
    ) -> Result<QueryOutcome, SutError> {
        Ok(self.answer(category, payload))
    }

    fn name(&self) -> &str {
        "stub-registry"
    }
}

fn required<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str, String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(format!("{} must not be empty", key)),
        None => Err(format!("{} is required", key)),
    }
}

fn find_provider(name: &str) -> Option<&'static ProviderEntry> {
    PROVIDERS
        .iter()
        .find(|provider| provider.name.eq_ignore_ascii_case(name))
}

fn resolve_provider(
    name: Option<&str>,
    namespace: Option<&str>,
    version: Option<&str>,
    data_type: Option<&str>,
    service_slug: Option<&str>,
) -> Lookup {
    let name = required(name, "provider_name")?;
    let provider = find_provider(name).ok_or_else(|| format!("provider '{}' not found", name))?;

    match namespace.map(str::trim).filter(|ns| !ns.is_empty()) {
        None if !provider.is_hashicorp_owned() => {
            return Err(format!(
                "provider_namespace is required for third-party provider '{}'",
                provider.name
            ));
        }
        Some(ns) if !ns.eq_ignore_ascii_case(provider.namespace) => {
            if !provider.is_hashicorp_owned() {
                return Err(format!("provider '{}/{}' not found", ns, provider.name));
            }
            debug!(namespace = ns, provider = provider.name, "Falling back to hashicorp namespace");
        }
        _ => {}
    }

    let version = match version.map(str::trim) {
        None | Some("") | Some(LATEST) => provider.latest_version(),
        Some(v) => provider
            .versions
            .iter()
            .copied()
            .find(|known| *known == v)
            .ok_or_else(|| format!("version '{}' of provider '{}' not found", v, provider.name))?,
    };

    let content_type = match data_type {
        None => ContentType::Resource,
        Some(raw) => ContentType::parse_data_type(raw.trim())
            .ok_or_else(|| format!("unknown provider_data_type '{}'", raw))?,
    };

    let slug = required(service_slug, "service_slug")?;
    let prefix = format!("{}_", provider.name);
    let short_slug = slug.strip_prefix(prefix.as_str()).unwrap_or(slug);
    let entry = provider
        .docs
        .iter()
        .find(|entry| {
            entry.content_type == content_type && (entry.slug == short_slug || entry.slug == slug)
        })
        .ok_or_else(|| {
            format!(
                "no {} documentation for '{}' in provider '{}'",
                content_type, slug, provider.name
            )
        })?;

    Ok(json!({
        "providerDocID": entry.doc_id,
        "provider": format!("{}/{}", provider.namespace, provider.name),
        "version": version,
        "dataType": content_type.as_str(),
        "slug": entry.slug,
        "title": entry.title,
    }))
}

fn provider_docs(doc_id: Option<&str>) -> Lookup {
    let doc_id = required(doc_id, "provider_doc_id")?;
    if !doc_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("provider_doc_id '{}' must be numeric", doc_id));
    }
    PROVIDERS
        .iter()
        .flat_map(|provider| provider.docs.iter().map(move |entry| (provider, entry)))
        .find(|(_, entry)| entry.doc_id == doc_id)
        .map(|(provider, entry)| {
            json!({
                "id": entry.doc_id,
                "provider": format!("{}/{}", provider.namespace, provider.name),
                "category": entry.content_type.as_str(),
                "slug": entry.slug,
                "title": entry.title,
                "content": format!("# {}\n", entry.title),
            })
        })
        .ok_or_else(|| format!("provider doc '{}' not found", doc_id))
}

/// True when every whitespace-separated term occurs in one of `fields`.
fn matches_terms(terms: &[String], fields: &[&str]) -> bool {
    let haystack = fields.join(" ").to_lowercase();
    terms.iter().all(|term| haystack.contains(term.as_str()))
}

fn terms_of(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

fn module_summary(module: &ModuleEntry) -> Value {
    json!({
        "id": format!("{}/{}", module.id(), module.latest_version()),
        "namespace": module.namespace,
        "name": module.name,
        "provider": module.provider,
        "version": module.latest_version(),
        "description": module.description,
    })
}

fn search_modules(query: Option<&str>, offset: Option<i64>, has_offset: bool) -> Lookup {
    let query = query.ok_or_else(|| "module_query is required".to_string())?;
    if has_offset && offset.is_none() {
        return Err("current_offset must be an integer".to_string());
    }

    let terms = terms_of(query);
    let matched: Vec<&ModuleEntry> = MODULES
        .iter()
        .filter(|m| matches_terms(&terms, &[m.namespace, m.name, m.provider, m.description]))
        .collect();
    if matched.is_empty() {
        return Err(format!("no modules found for query '{}'", query));
    }

    let offset = usize::try_from(offset.unwrap_or(0).max(0)).unwrap_or(usize::MAX);
    let page: Vec<Value> = matched
        .iter()
        .skip(offset)
        .take(PAGE_SIZE)
        .map(|module| module_summary(module))
        .collect();
    Ok(json!({
        "query": query,
        "offset": offset,
        "total": matched.len(),
        "modules": page,
    }))
}

fn module_details(module_id: Option<&str>) -> Lookup {
    let module_id = required(module_id, "module_id")?;
    let parts: Vec<&str> = module_id.split('/').collect();
    let [namespace, name, provider, version] = parts.as_slice() else {
        return Err(format!(
            "module_id '{}' must look like <namespace>/<name>/<provider>/<version>",
            module_id
        ));
    };
    if parts.iter().any(|part| part.is_empty()) {
        return Err(format!("module_id '{}' has an empty segment", module_id));
    }

    MODULES
        .iter()
        .find(|m| {
            m.namespace.eq_ignore_ascii_case(namespace)
                && m.name == *name
                && m.provider == *provider
                && m.versions.contains(version)
        })
        .map(|m| {
            json!({
                "id": module_id,
                "namespace": m.namespace,
                "name": m.name,
                "provider": m.provider,
                "version": version,
                "description": m.description,
                "versions": m.versions,
            })
        })
        .ok_or_else(|| format!("module '{}' not found", module_id))
}

fn search_policies(query: Option<&str>) -> Lookup {
    let query = required(query, "policy_query")?;
    let terms = terms_of(query);
    let matched: Vec<Value> = POLICIES
        .iter()
        .filter(|p| matches_terms(&terms, &[p.name, p.title]))
        .map(|p| {
            json!({
                "id": p.id(),
                "name": p.name,
                "title": p.title,
                "version": p.version,
            })
        })
        .collect();
    if matched.is_empty() {
        return Err(format!("no policies found for query '{}'", query));
    }
    Ok(json!({ "query": query, "policies": matched }))
}

fn policy_details(policy_id: Option<&str>) -> Lookup {
    let policy_id = required(policy_id, "terraform_policy_id")?;
    let parts: Vec<&str> = policy_id.split('/').collect();
    let ["policies", namespace, name, version] = parts.as_slice() else {
        return Err(format!(
            "terraform_policy_id '{}' must look like policies/<namespace>/<name>/<version>",
            policy_id
        ));
    };

    POLICIES
        .iter()
        .find(|p| p.namespace == *namespace && p.name == *name && p.version == *version)
        .map(|p| {
            json!({
                "id": p.id(),
                "name": p.name,
                "title": p.title,
                "version": p.version,
                "owner": if p.namespace == HASHICORP_NAMESPACE { "HashiCorp" } else { p.namespace },
            })
        })
        .ok_or_else(|| format!("policy '{}' not found", policy_id))
}
