use serde::Deserialize;
use serde::Serialize;

/// Documentation section a provider fixture targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "resources", alias = "resource")]
    Resource,
    #[serde(rename = "data-sources", alias = "data-source")]
    DataSource,
    #[serde(rename = "guides", alias = "guide")]
    Guide,
    #[serde(rename = "functions", alias = "function")]
    Function,
    #[serde(rename = "overview")]
    Overview,
}

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        ContentType::Resource,
        ContentType::DataSource,
        ContentType::Guide,
        ContentType::Function,
        ContentType::Overview,
    ];

    /// Value used for `provider_data_type` in payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Resource => "resources",
            ContentType::DataSource => "data-sources",
            ContentType::Guide => "guides",
            ContentType::Function => "functions",
            ContentType::Overview => "overview",
        }
    }

    /// Parses a `provider_data_type` value, accepting singular spellings.
    pub fn parse_data_type(value: &str) -> Option<ContentType> {
        match value {
            "resources" | "resource" => Some(ContentType::Resource),
            "data-sources" | "data-source" => Some(ContentType::DataSource),
            "guides" | "guide" => Some(ContentType::Guide),
            "functions" | "function" => Some(ContentType::Function),
            "overview" => Some(ContentType::Overview),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
