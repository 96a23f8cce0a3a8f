//! Built-in fixtures for every registry query category.
//!
//! Several expectations encode how the live registry actually behaves rather
//! than what the payload suggests (`malformed_namespace` resolves,
//! `incorrect_numeric_doc_id` does not). Confirm against the registry before
//! changing any of them.

use crate::domain::category::QueryCategory;
use crate::domain::content_type::ContentType;
use crate::domain::payload::Payload;
use crate::domain::test_case::TestCase;
use crate::domain::test_case::TestCaseGroup;

pub(super) fn builtin_groups() -> Vec<TestCaseGroup> {
    vec![
        TestCaseGroup::new(QueryCategory::Provider, provider_cases()),
        TestCaseGroup::new(QueryCategory::ProviderDocs, provider_docs_cases()),
        TestCaseGroup::new(QueryCategory::SearchModules, search_modules_cases()),
        TestCaseGroup::new(QueryCategory::ModuleDetails, module_details_cases()),
        TestCaseGroup::new(QueryCategory::SearchPolicies, search_policies_cases()),
        TestCaseGroup::new(QueryCategory::PolicyDetails, policy_details_cases()),
    ]
}

fn provider_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("empty_payload", true, "Testing with empty payload"),
        TestCase::new(
            "missing_namespace_and_version",
            true,
            "Testing without provider_namespace and provider_version",
        )
        .with_payload(Payload::new().with("provider_name", "google")),
        TestCase::new("without_version", false, "Testing without provider_version").with_payload(
            Payload::new()
                .with("provider_name", "azurerm")
                .with("provider_namespace", "hashicorp")
                .with("service_slug", "azurerm_iot_security_solution"),
        ),
        TestCase::new(
            "hashicorp_without_namespace",
            false,
            "Testing without provider_namespace, but owned by hashicorp",
        )
        .with_payload(
            Payload::new()
                .with("provider_name", "aws")
                .with("provider_version", "latest")
                .with("service_slug", "aws_s3_bucket"),
        ),
        TestCase::new(
            "third_party_without_namespace",
            true,
            "Testing without provider_namespace, but not-owned by hashicorp",
        )
        .with_payload(
            Payload::new()
                .with("provider_name", "snowflake")
                .with("provider_version", "latest"),
        ),
        TestCase::new("required_values_resource", false, "Testing only with required values")
        .with_content_type(ContentType::Resource)
        .with_payload(
            Payload::new()
                .with("provider_name", "dns")
                .with("provider_namespace", "hashicorp")
                .with("service_slug", "ns_record_set"),
        ),
        TestCase::new(
            "data_source_with_prefix",
            false,
            "Testing only with required values with the provider_name prefix",
        )
        .with_content_type(ContentType::DataSource)
        .with_payload(
            Payload::new()
                .with("provider_name", "dns")
                .with("provider_namespace", "hashicorp")
                .with("provider_data_type", "data-sources")
                .with("service_slug", "dns_ns_record_set"),
        ),
        TestCase::new(
            "third_party_resource",
            false,
            "Testing resources with all values for non-hashicorp provider_namespace",
        )
        .with_content_type(ContentType::Resource)
        .with_payload(
            Payload::new()
                .with("provider_name", "pinecone")
                .with("provider_namespace", "pinecone-io")
                .with("provider_version", "latest")
                .with("provider_data_type", "resources")
                .with("service_slug", "pinecone_index"),
        ),
        TestCase::new(
            "third_party_data_source",
            false,
            "Testing data-sources for non-hashicorp provider_namespace",
        )
        .with_content_type(ContentType::DataSource)
        .with_payload(
            Payload::new()
                .with("provider_name", "terracurl")
                .with("provider_namespace", "devops-rob")
                .with("provider_data_type", "data-sources")
                .with("service_slug", "terracurl"),
        ),
        TestCase::new(
            "malformed_namespace",
            false,
            "Testing payload with malformed provider_namespace",
        )
        .with_payload(
            Payload::new()
                .with("provider_name", "vault")
                .with("provider_namespace", "hashicorp-malformed")
                .with("provider_version", "latest")
                .with("service_slug", "vault_aws_auth_backend_role"),
        ),
        TestCase::new(
            "malformed_provider_name",
            true,
            "Testing payload with malformed provider_name",
        )
        .with_payload(
            Payload::new()
                .with("provider_name", "vaults")
                .with("provider_namespace", "hashicorp")
                .with("provider_version", "latest"),
        ),
        TestCase::new("guides_documentation", false, "Testing guides documentation with v2 API")
        .with_content_type(ContentType::Guide)
        .with_payload(
            Payload::new()
                .with("provider_name", "aws")
                .with("provider_namespace", "hashicorp")
                .with("provider_version", "latest")
                .with("provider_data_type", "guides")
                .with("service_slug", "custom-service-endpoints"),
        ),
        TestCase::new(
            "functions_documentation",
            false,
            "Testing functions documentation with v2 API",
        )
        .with_content_type(ContentType::Function)
        .with_payload(
            Payload::new()
                .with("provider_name", "google")
                .with("provider_namespace", "hashicorp")
                .with("provider_version", "latest")
                .with("provider_data_type", "functions")
                .with("service_slug", "name_from_id"),
        ),
        TestCase::new("overview_documentation", false, "Testing overview documentation with v2 API")
        .with_content_type(ContentType::Overview)
        .with_payload(
            Payload::new()
                .with("provider_name", "google")
                .with("provider_namespace", "hashicorp")
                .with("provider_version", "latest")
                .with("provider_data_type", "overview")
                .with("service_slug", "index"),
        ),
    ]
}

fn provider_docs_cases() -> Vec<TestCase> {
    let doc_id = |id: &str| Payload::new().with("provider_doc_id", id);
    vec![
        TestCase::new("empty_payload", true, "Testing providerDocs with empty payload"),
        TestCase::new("empty_doc_id", true, "Testing providerDocs with empty provider_doc_id")
        .with_payload(doc_id("")),
        TestCase::new("invalid_doc_id", true, "Testing providerDocs with invalid provider_doc_id")
        .with_payload(doc_id("invalid-doc-id")),
        TestCase::new(
            "valid_doc_id",
            false,
            "Testing providerDocs with all correct provider_doc_id value",
        )
        .with_payload(doc_id("8894603")),
        TestCase::new(
            "incorrect_numeric_doc_id",
            true,
            "Testing providerDocs with incorrect numeric provider_doc_id value",
        )
        .with_payload(doc_id("3356809")),
    ]
}

fn search_modules_cases() -> Vec<TestCase> {
    let query = |q: &str| Payload::new().with("module_query", q);
    vec![
        TestCase::new("no_parameters", true, "Testing search_modules with no parameters"),
        TestCase::new(
            "empty_query_all_modules",
            false,
            "Testing search_modules with empty module_query - all modules",
        )
        .with_payload(query("")),
        TestCase::new(
            "aws_query_no_offset",
            false,
            "Testing search_modules with module_query 'aws' - no offset",
        )
        .with_payload(query("aws")),
        TestCase::new(
            "empty_query_with_offset",
            false,
            "Testing search_modules with module_query '' and current_offset 10",
        )
        .with_payload(query("").with("current_offset", 10)),
        TestCase::new(
            "offset_only",
            false,
            "Testing search_modules with current_offset 5 only - all modules",
        )
        .with_payload(query("").with("current_offset", 5)),
        TestCase::new(
            "negative_offset",
            false,
            "Testing search_modules with invalid current_offset (negative)",
        )
        .with_payload(query("").with("current_offset", -1)),
        TestCase::new(
            "unknown_provider",
            true,
            "Testing search_modules with a module_query not in the map (e.g., 'unknownprovider')",
        )
        .with_payload(query("unknownprovider")),
        TestCase::new(
            "vsphere_capitalized",
            false,
            "Testing search_modules with vSphere (capitalized)",
        )
        .with_payload(query("vSphere")),
        TestCase::new(
            "aviatrix_provider",
            false,
            "Testing search_modules with Aviatrix (handle terraform-provider-modules)",
        )
        .with_payload(query("aviatrix")),
        TestCase::new("oci_provider", false, "Testing search_modules with oci")
            .with_payload(query("oci")),
        TestCase::new(
            "query_with_spaces",
            false,
            "Testing search_modules with vertex ai - query with spaces",
        )
        .with_payload(query("vertex ai")),
    ]
}

fn module_details_cases() -> Vec<TestCase> {
    let module_id = |id: &str| Payload::new().with("module_id", id);
    vec![
        TestCase::new("valid_module_id", false, "Testing module_details with valid module_id")
        .with_payload(module_id("terraform-aws-modules/vpc/aws/2.1.0")),
        TestCase::new("missing_module_id", true, "Testing module_details missing module_id"),
        TestCase::new("empty_module_id", true, "Testing module_details with empty module_id")
        .with_payload(module_id("")),
        TestCase::new(
            "nonexistent_module_id",
            true,
            "Testing module_details with non-existent module_id",
        )
        .with_payload(module_id("hashicorp/nonexistentmodule/aws/1.0.0")),
        // The tool call itself may succeed here but carries no usable module.
        TestCase::new(
            "invalid_format",
            true,
            "Testing module_details with invalid module_id format",
        )
        .with_payload(module_id("invalid-format")),
    ]
}

fn search_policies_cases() -> Vec<TestCase> {
    let query = |q: &str| Payload::new().with("policy_query", q);
    vec![
        TestCase::new("", true, "Testing search_policies with empty payload"),
        TestCase::new("", true, "Testing search_policies with empty policy_query")
            .with_payload(query("")),
        TestCase::new("", false, "Testing search_policies with a valid hashicorp policy name")
        .with_payload(query("aws")),
        TestCase::new("", false, "Testing search_policies with a valid policy title substring")
        .with_payload(query("security")),
        TestCase::new("", true, "Testing search_policies with an invalid/nonexistent policy name")
        .with_payload(query("nonexistentpolicyxyz123")),
        TestCase::new("", false, "Testing search_policies with mixed case input")
            .with_payload(query("TeRrAfOrM")),
        TestCase::new(
            "",
            false,
            "Testing search_policies with policy name containing special characters",
        )
        .with_payload(query("cis-policy")),
        TestCase::new("", false, "Testing search_policies with policy name containing spaces")
        .with_payload(query("FSBP Foundations benchmark")),
    ]
}

fn policy_details_cases() -> Vec<TestCase> {
    let policy_id = |id: &str| Payload::new().with("terraform_policy_id", id);
    vec![
        TestCase::new("", false, "Testing policy_details with valid terraform_policy_id")
        .with_payload(policy_id(
            "policies/hashicorp/azure-storage-terraform/1.0.2",
        )),
        TestCase::new("", true, "Testing policy_details with missing terraform_policy_id"),
        TestCase::new("", true, "Testing policy_details with empty terraform_policy_id")
        .with_payload(policy_id("")),
        TestCase::new("", true, "Testing policy_details with non-existent terraform_policy_id")
        .with_payload(policy_id("nonexistent-policy-xyz")),
        TestCase::new("", true, "Testing policy_details with malformed terraform_policy_id")
        .with_payload(policy_id("malformed!@#")),
    ]
}
