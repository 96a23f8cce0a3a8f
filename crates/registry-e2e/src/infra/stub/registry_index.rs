//! Fixed registry contents served by the stub.

use crate::domain::ContentType;

pub(super) const HASHICORP_NAMESPACE: &str = "hashicorp";

pub(super) struct DocEntry {
    pub content_type: ContentType,
    pub slug: &'static str,
    pub doc_id: &'static str,
    pub title: &'static str,
}

pub(super) struct ProviderEntry {
    pub name: &'static str,
    pub namespace: &'static str,
    pub versions: &'static [&'static str],
    pub docs: &'static [DocEntry],
}

impl ProviderEntry {
    pub fn is_hashicorp_owned(&self) -> bool {
        self.namespace == HASHICORP_NAMESPACE
    }

    pub fn latest_version(&self) -> &'static str {
        self.versions.last().copied().unwrap_or("0.0.0")
    }
}

pub(super) struct ModuleEntry {
    pub namespace: &'static str,
    pub name: &'static str,
    pub provider: &'static str,
    pub versions: &'static [&'static str],
    pub description: &'static str,
}

impl ModuleEntry {
    pub fn id(&self) -> String {
        format!("{}/{}/{}", self.namespace, self.name, self.provider)
    }

    pub fn latest_version(&self) -> &'static str {
        self.versions.last().copied().unwrap_or("0.0.0")
    }
}

pub(super) struct PolicyEntry {
    pub namespace: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    pub title: &'static str,
}

impl PolicyEntry {
    pub fn id(&self) -> String {
        format!("policies/{}/{}/{}", self.namespace, self.name, self.version)
    }
}

const fn doc(
    content_type: ContentType,
    slug: &'static str,
    doc_id: &'static str,
    title: &'static str,
) -> DocEntry {
    DocEntry {
        content_type,
        slug,
        doc_id,
        title,
    }
}

pub(super) const PROVIDERS: &[ProviderEntry] = &[
    ProviderEntry {
        name: "aws",
        namespace: HASHICORP_NAMESPACE,
        versions: &["5.80.0", "5.94.1"],
        docs: &[
            doc(ContentType::Resource, "s3_bucket", "8894603", "aws_s3_bucket"),
            doc(ContentType::Resource, "instance", "8894541", "aws_instance"),
            doc(
                ContentType::Guide,
                "custom-service-endpoints",
                "8893905",
                "Custom Service Endpoint Configuration",
            ),
            doc(ContentType::Overview, "index", "8893801", "AWS Provider"),
        ],
    },
    ProviderEntry {
        name: "azurerm",
        namespace: HASHICORP_NAMESPACE,
        versions: &["4.20.0", "4.26.0"],
        docs: &[
            doc(
                ContentType::Resource,
                "iot_security_solution",
                "8902235",
                "azurerm_iot_security_solution",
            ),
            doc(
                ContentType::DataSource,
                "resource_group",
                "8901840",
                "azurerm_resource_group",
            ),
        ],
    },
    ProviderEntry {
        name: "google",
        namespace: HASHICORP_NAMESPACE,
        versions: &["6.20.0", "6.28.0"],
        docs: &[
            doc(
                ContentType::Function,
                "name_from_id",
                "8885212",
                "name_from_id",
            ),
            doc(ContentType::Overview, "index", "8885011", "Google Cloud Platform Provider"),
            doc(
                ContentType::Resource,
                "compute_instance",
                "8885350",
                "google_compute_instance",
            ),
        ],
    },
    ProviderEntry {
        name: "dns",
        namespace: HASHICORP_NAMESPACE,
        versions: &["3.4.2", "3.4.3"],
        docs: &[
            doc(
                ContentType::Resource,
                "ns_record_set",
                "8640213",
                "dns_ns_record_set",
            ),
            doc(
                ContentType::DataSource,
                "ns_record_set",
                "8640207",
                "dns_ns_record_set",
            ),
        ],
    },
    ProviderEntry {
        name: "vault",
        namespace: HASHICORP_NAMESPACE,
        versions: &["4.6.0", "4.7.0"],
        docs: &[doc(
            ContentType::Resource,
            "aws_auth_backend_role",
            "8860524",
            "vault_aws_auth_backend_role",
        )],
    },
    ProviderEntry {
        name: "snowflake",
        namespace: "Snowflake-Labs",
        versions: &["1.0.4", "1.0.5"],
        docs: &[doc(
            ContentType::Resource,
            "database",
            "8870112",
            "snowflake_database",
        )],
    },
    ProviderEntry {
        name: "pinecone",
        namespace: "pinecone-io",
        versions: &["0.7.5", "1.0.0"],
        docs: &[doc(ContentType::Resource, "index", "8796113", "pinecone_index")],
    },
    ProviderEntry {
        name: "terracurl",
        namespace: "devops-rob",
        versions: &["1.2.1", "1.2.2"],
        docs: &[doc(
            ContentType::DataSource,
            "terracurl",
            "8651390",
            "terracurl",
        )],
    },
];

pub(super) const MODULES: &[ModuleEntry] = &[
    ModuleEntry {
        namespace: "terraform-aws-modules",
        name: "vpc",
        provider: "aws",
        versions: &["2.1.0", "5.19.0"],
        description: "Terraform module which creates VPC resources on AWS",
    },
    ModuleEntry {
        namespace: "terraform-aws-modules",
        name: "eks",
        provider: "aws",
        versions: &["19.21.0", "20.35.0"],
        description: "Terraform module to create Amazon Elastic Kubernetes (EKS) resources",
    },
    ModuleEntry {
        namespace: "terraform-aws-modules",
        name: "s3-bucket",
        provider: "aws",
        versions: &["3.15.2", "4.6.0"],
        description: "Terraform module which creates S3 bucket resources on AWS",
    },
    ModuleEntry {
        namespace: "terraform-aws-modules",
        name: "iam",
        provider: "aws",
        versions: &["5.54.0"],
        description: "Terraform module which creates IAM resources on AWS",
    },
    ModuleEntry {
        namespace: "Azure",
        name: "aks",
        provider: "azurerm",
        versions: &["9.4.1"],
        description: "Terraform module for deploying a managed Kubernetes cluster on Azure",
    },
    ModuleEntry {
        namespace: "Azure",
        name: "avm-res-storage-storageaccount",
        provider: "azurerm",
        versions: &["0.5.0"],
        description: "Azure Verified Module for Storage Accounts",
    },
    ModuleEntry {
        namespace: "terraform-google-modules",
        name: "network",
        provider: "google",
        versions: &["10.0.0"],
        description: "Sets up a new VPC network on Google Cloud",
    },
    ModuleEntry {
        namespace: "GoogleCloudPlatform",
        name: "vertex-ai",
        provider: "google",
        versions: &["0.2.0"],
        description: "Deploys Vertex AI workbench instances, endpoints and feature stores",
    },
    ModuleEntry {
        namespace: "Terraform-VMware-Modules",
        name: "vm",
        provider: "vsphere",
        versions: &["3.8.0"],
        description: "Terraform module for deploying virtual machines on VMware vSphere",
    },
    ModuleEntry {
        namespace: "terraform-aviatrix-modules",
        name: "mc-transit",
        provider: "aviatrix",
        versions: &["2.6.0"],
        description: "Deploys a multi-cloud transit gateway with Aviatrix",
    },
    ModuleEntry {
        namespace: "oracle-terraform-modules",
        name: "vcn",
        provider: "oci",
        versions: &["3.6.0"],
        description: "Creates a virtual cloud network on Oracle Cloud Infrastructure",
    },
    ModuleEntry {
        namespace: "oracle-terraform-modules",
        name: "oke",
        provider: "oci",
        versions: &["5.2.4"],
        description: "Provisions Oracle Container Engine for Kubernetes clusters",
    },
    ModuleEntry {
        namespace: "cloudposse",
        name: "label",
        provider: "null",
        versions: &["0.25.0"],
        description: "Generates consistent names and tags for resources",
    },
    ModuleEntry {
        namespace: "kube-hetzner",
        name: "kube-hetzner",
        provider: "hcloud",
        versions: &["2.16.1"],
        description: "Optimized and maintenance-free Kubernetes on Hetzner Cloud",
    },
    ModuleEntry {
        namespace: "hashicorp",
        name: "consul",
        provider: "aws",
        versions: &["0.11.0"],
        description: "Deploys a Consul cluster on AWS",
    },
    ModuleEntry {
        namespace: "terraform-ibm-modules",
        name: "base-ocp-vpc",
        provider: "ibm",
        versions: &["3.46.0"],
        description: "Provisions a Red Hat OpenShift cluster on IBM Cloud VPC",
    },
];

pub(super) const POLICIES: &[PolicyEntry] = &[
    PolicyEntry {
        namespace: HASHICORP_NAMESPACE,
        name: "azure-storage-terraform",
        version: "1.0.2",
        title: "Pre-written Sentinel policies for Azure Storage security",
    },
    PolicyEntry {
        namespace: HASHICORP_NAMESPACE,
        name: "aws-fsbp-foundations-benchmark",
        version: "1.0.0",
        title: "AWS Foundational Security Best Practices (FSBP) Foundations Benchmark",
    },
    PolicyEntry {
        namespace: HASHICORP_NAMESPACE,
        name: "cis-policy-aws-terraform",
        version: "1.0.1",
        title: "CIS Amazon Web Services Foundations Benchmark policies",
    },
    PolicyEntry {
        namespace: HASHICORP_NAMESPACE,
        name: "gcp-cis-terraform",
        version: "1.0.0",
        title: "CIS Google Cloud Platform Foundations Benchmark policies",
    },
    PolicyEntry {
        namespace: HASHICORP_NAMESPACE,
        name: "aws-mandatory-tags",
        version: "0.3.0",
        title: "Require mandatory tags on AWS resources",
    },
];
