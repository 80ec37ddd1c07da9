//! OpenAlex HTTP client
//!
//! Handles communication with the OpenAlex REST API.
//! See: https://docs.openalex.org/how-to-use-the-api/api-overview
//!
//! No authentication. A mailto query parameter moves requests into the
//! polite pool, which gets faster and more consistent service.

use super::{adapter, dto};
use crate::config::SourceSettings;
use crate::enrichment::client::{RateLimitedClient, USER_AGENT};
use crate::enrichment::domain::{EnrichedMetadata, MetadataSource, SourceError};
use crate::enrichment::{ids, matching};
use crate::model::BibEntry;

const DEFAULT_BASE_URL: &str = "https://api.openalex.org/works";
const DEFAULT_RATE_LIMIT_SECS: f64 = 0.1;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Results requested per search; one page is plenty for best-match picking
const SEARCH_PER_PAGE: u32 = 10;

/// OpenAlex API client
pub struct OpenAlexClient {
    http: RateLimitedClient,
    base_url: String,
    mailto: Option<String>,
    title_threshold: f64,
}

impl OpenAlexClient {
    /// Create a client, resolving unset settings to OpenAlex's documented
    /// defaults.
    pub fn new(settings: &SourceSettings, title_threshold: f64) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout_or(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http: RateLimitedClient::new(
                MetadataSource::OpenAlex,
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
                MetadataSource::OpenAlex,
                transport,
                std::time::Duration::ZERO,
                crate::enrichment::retry::RetryPolicy::none(),
            ),
            base_url: DEFAULT_BASE_URL.to_string(),
            mailto: None,
            title_threshold,
        }
    }

    /// Resolve one entry: DOI lookup first, title search as fallback.
    pub async fn resolve(
        &self,
        entry: &BibEntry,
    ) -> Result<Option<EnrichedMetadata>, SourceError> {
        if let Some(raw) = entry.doi.as_deref() {
            let doi = ids::clean_doi(raw);
            if !doi.is_empty() {
                if let Some(found) = self.lookup_doi(&doi).await? {
                    return Ok(Some(found));
                }
            }
        }

        self.search_title(entry).await
    }

    /// Look up a work by DOI. OpenAlex addresses works by their full
    /// doi.org URL, appended to the path as-is. `Ok(None)` when the work
    /// is not indexed.
    pub async fn lookup_doi(&self, doi: &str) -> Result<Option<EnrichedMetadata>, SourceError> {
        let mut url = format!("{}/https://doi.org/{}", self.base_url, doi);
        if let Some(mailto) = &self.mailto {
            url.push_str(&format!("?mailto={}", urlencoding::encode(mailto)));
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

        let parsed: dto::Work = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(Some(adapter::to_metadata(parsed)))
    }

    /// Search by title, returning the best candidate that clears the
    /// similarity threshold.
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
            "{}?search={}&per-page={}",
            self.base_url,
            urlencoding::encode(&clean_title),
            SEARCH_PER_PAGE,
        );
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

        Ok(self.best_match(entry, parsed.results))
    }

    /// Pick the highest-confidence candidate whose title clears the
    /// threshold, recording the confidence on the returned record.
    fn best_match(&self, entry: &BibEntry, works: Vec<dto::Work>) -> Option<EnrichedMetadata> {
        let mut best_score = 0.0_f64;
        let mut best_work: Option<dto::Work> = None;

        for work in works {
            let Some(candidate_title) = work.title.as_deref() else {
                continue;
            };

            let title_sim = matching::title_similarity(&entry.title, candidate_title);
            if title_sim < self.title_threshold {
                continue;
            }

            let author_sim = matching::author_similarity(
                &entry.authors,
                &adapter::author_names(&work.authorships),
            );
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
