//! Crossref HTTP client
//!
//! Handles communication with the Crossref REST API.
//! See: https://api.crossref.org/swagger-ui/index.html
//!
//! Crossref asks clients to identify themselves; requests carrying a
//! mailto are routed through the better-provisioned "polite" pool.

use super::{adapter, dto};
use crate::config::SourceSettings;
use crate::enrichment::client::{RateLimitedClient, USER_AGENT};
use crate::enrichment::domain::{EnrichedMetadata, MetadataSource, SourceError};
use crate::enrichment::{ids, matching};
use crate::model::BibEntry;

const DEFAULT_BASE_URL: &str = "https://api.crossref.org/works";
const DEFAULT_RATE_LIMIT_SECS: f64 = 1.0;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Results requested per search; one page is plenty for best-match picking
const SEARCH_ROWS: u32 = 10;

/// Fields requested from the search endpoint; DOI lookups return everything
const SELECT_FIELDS: &str = "DOI,title,author,published-print,published-online,abstract,subject,container-title,references-count,is-referenced-by-count,score";

/// Crossref API client
pub struct CrossrefClient {
    http: RateLimitedClient,
    base_url: String,
    mailto: Option<String>,
    title_threshold: f64,
}

impl CrossrefClient {
    /// Create a client, resolving unset settings to Crossref's documented
    /// defaults.
    pub fn new(settings: &SourceSettings, title_threshold: f64) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout_or(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http: RateLimitedClient::new(
                MetadataSource::Crossref,
                http_client,
                settings.rate_limit_or(DEFAULT_RATE_LIMIT_SECS),
                settings.retry_policy(),
            ),
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            mailto: settings.mailto.clone(),
            title_threshold,
        }
    }

    /// Create a client over a scripted transport for tests.
    #[cfg(test)]
    fn with_transport(
        transport: std::sync::Arc<dyn crate::enrichment::client::Transport>,
        title_threshold: f64,
    ) -> Self {
        Self {
            http: RateLimitedClient::with_transport(
                MetadataSource::Crossref,
                transport,
                std::time::Duration::ZERO,
                crate::enrichment::retry::RetryPolicy::none(),
            ),
            base_url: DEFAULT_BASE_URL.to_string(),
            mailto: None,
            title_threshold,
        }
    }

    /// Resolve one entry: DOI lookup when the entry carries a usable DOI,
    /// title search otherwise or when the DOI is unknown to Crossref.
    pub async fn resolve(
        &self,
        entry: &BibEntry,
    ) -> Result<Option<EnrichedMetadata>, SourceError> {
        if let Some(raw) = entry.doi.as_deref() {
            let doi = ids::clean_doi(raw);
            if ids::is_valid_doi(&doi) {
                if let Some(found) = self.lookup_doi(&doi).await? {
                    return Ok(Some(found));
                }
            } else {
                tracing::warn!(entry = %entry.key, doi = raw, "invalid DOI format, using title search");
            }
        }

        self.search_title(entry).await
    }

    /// Look up a work by DOI. `Ok(None)` when Crossref has not registered it.
    pub async fn lookup_doi(&self, doi: &str) -> Result<Option<EnrichedMetadata>, SourceError> {
        let mut url = format!("{}/{}", self.base_url, urlencoding::encode(doi));
        if let Some(mailto) = &self.mailto {
            url = format!("{url}?mailto={}", urlencoding::encode(mailto));
        }

        let response = self.http.get(&url).await?;

        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(SourceError::Status {
                status: response.status,
                message: response.body_excerpt(),
            });
        }

        let parsed: dto::WorkResponse = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(Some(adapter::to_metadata(parsed.message)))
    }

    /// Search by title (and first author surname when present), returning
    /// the best candidate that clears the similarity threshold.
    pub async fn search_title(
        &self,
        entry: &BibEntry,
    ) -> Result<Option<EnrichedMetadata>, SourceError> {
        let clean_title = matching::clean_title_for_search(&entry.title);
        if clean_title.len() < matching::MIN_SEARCH_TITLE_LEN {
            tracing::debug!(entry = %entry.key, "title too short for reliable search");
            return Ok(None);
        }

        let mut url = format!(
            "{}?query.title={}&rows={}&select={}",
            self.base_url,
            urlencoding::encode(&clean_title),
            SEARCH_ROWS,
            SELECT_FIELDS,
        );
        if let Some(surname) = matching::first_author_surname(&entry.authors) {
            url.push_str(&format!("&query.author={}", urlencoding::encode(&surname)));
        }
        if let Some(mailto) = &self.mailto {
            url.push_str(&format!("&mailto={}", urlencoding::encode(mailto)));
        }

        let response = self.http.get(&url).await?;

        if !response.is_success() {
            return Err(SourceError::Status {
                status: response.status,
                message: response.body_excerpt(),
            });
        }

        let parsed: dto::SearchResponse = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(self.best_match(entry, parsed.message.items))
    }

    /// Pick the highest-confidence candidate whose title clears the
    /// threshold, recording the confidence on the returned record.
    fn best_match(&self, entry: &BibEntry, items: Vec<dto::Work>) -> Option<EnrichedMetadata> {
        let mut best_score = 0.0_f64;
        let mut best_work: Option<dto::Work> = None;

        for work in items {
            let Some(candidate_title) = work.title.first() else {
                continue;
            };

            let title_sim = matching::title_similarity(&entry.title, candidate_title);
            if title_sim < self.title_threshold {
                continue;
            }

            let author_sim =
                matching::author_similarity(&entry.authors, &adapter::author_names(&work.author));
            let confidence = matching::match_confidence(title_sim, author_sim);

            if confidence > best_score {
                best_score = confidence;
                best_work = Some(work);
            }
        }

        best_work.map(|work| {
            let mut metadata = adapter::to_metadata(work);
            metadata.match_score = Some(best_score);
            metadata
        })
    }
}
