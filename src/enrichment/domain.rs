//! Internal domain models for bibliography enrichment.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All external API responses get converted into these types via adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which external service supplied a metadata record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataSource {
    Crossref,
    SemanticScholar,
    OpenAlex,
    Arxiv,
}

impl MetadataSource {
    /// Stable identifier used in logs, config and persisted cache records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crossref => "crossref",
            Self::SemanticScholar => "semantic_scholar",
            Self::OpenAlex => "openalex",
            Self::Arxiv => "arxiv",
        }
    }

    /// Parse a config identifier. Accepts the serialized form only.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "crossref" => Some(Self::Crossref),
            "semantic_scholar" => Some(Self::SemanticScholar),
            "openalex" => Some(Self::OpenAlex),
            "arxiv" => Some(Self::Arxiv),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata obtained for one bibliography entry.
///
/// Every field besides `source` and `fetched_at` is optional: absence is a
/// valid, common state and must stay distinguishable from a genuine zero
/// (zero citations is `Some(0)`, unknown is `None`). Records are never
/// mutated after creation - a re-run produces a replacement keyed
/// identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMetadata {
    /// Which adapter supplied this record
    pub source: MetadataSource,
    /// Resolved DOI (normalized, no URL prefix)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Canonical https://doi.org/... form of the DOI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi_url: Option<String>,
    /// Landing page URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// arXiv abstract page URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arxiv_url: Option<String>,
    /// Direct PDF URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    /// Abstract text
    #[serde(
        rename = "abstract",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub abstract_text: Option<String>,
    /// Publication date, "YYYY", "YYYY-MM" or "YYYY-MM-DD"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    /// Times this work has been cited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_count: Option<u64>,
    /// Number of references this work makes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_count: Option<u64>,
    /// Venue/journal name as reported by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    /// Author names as reported by the source
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// Subject/field classifications
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    /// Whether the work is open access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open_access: Option<bool>,
    /// Match confidence for search-based results; absent for identifier
    /// lookups, which are exact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    /// When this record was fetched
    pub fetched_at: DateTime<Utc>,
}

impl EnrichedMetadata {
    /// Create an empty record for a source, timestamped now.
    pub fn new(source: MetadataSource) -> Self {
        Self {
            source,
            doi: None,
            doi_url: None,
            url: None,
            arxiv_url: None,
            pdf_url: None,
            abstract_text: None,
            publication_date: None,
            citation_count: None,
            reference_count: None,
            venue: None,
            authors: Vec::new(),
            subjects: Vec::new(),
            is_open_access: None,
            match_score: None,
            fetched_at: Utc::now(),
        }
    }

    /// Set the DOI and derive its canonical URL form.
    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        let doi = doi.into();
        self.doi_url = Some(format!("https://doi.org/{}", doi));
        self.doi = Some(doi);
        self
    }
}

/// Errors reported by source clients and adapters.
///
/// NotFound and below-threshold matches are NOT errors - adapters report
/// those as an absent result. These variants cover transport and protocol
/// faults only.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("rate limited - try again later")]
    RateLimited,
}

impl SourceError {
    /// Transient failures are worth retrying; permanent ones are not.
    ///
    /// Network faults, timeouts, 429 and server-side 5xx are transient.
    /// Client-side 4xx and malformed payloads are permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Api(_) | Self::Parse(_) => false,
        }
    }
}
