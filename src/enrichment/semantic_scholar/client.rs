//! Semantic Scholar HTTP client
//!
//! Handles communication with the Academic Graph API.
//! See: https://api.semanticscholar.org/api-docs/
//!
//! Works unauthenticated at a shared (heavily throttled) rate; an API
//! key goes out as the x-api-key header on every request.

use reqwest::header;

use super::{adapter, dto};
use crate::config::SourceSettings;
use crate::enrichment::client::{RateLimitedClient, USER_AGENT};
use crate::enrichment::domain::{EnrichedMetadata, MetadataSource, SourceError};
use crate::enrichment::{ids, matching};
use crate::model::BibEntry;

const DEFAULT_BASE_URL: &str = "https://api.semanticscholar.org/graph/v1";
const DEFAULT_RATE_LIMIT_SECS: f64 = 1.0;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Results requested per search; generous because relevance ranking for
/// short titles is noisy
const SEARCH_LIMIT: u32 = 20;

/// Fields requested on every endpoint
const FIELDS: &str =
    "title,authors,abstract,venue,year,citationCount,referenceCount,externalIds,url,openAccessPdf";

/// Semantic Scholar API client
pub struct SemanticScholarClient {
    http: RateLimitedClient,
    base_url: String,
    title_threshold: f64,
}

impl SemanticScholarClient {
    /// Create a client, resolving unset settings to the API's defaults.
    pub fn new(settings: &SourceSettings, title_threshold: f64) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(key) = &settings.api_key {
            match header::HeaderValue::from_str(key) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert("x-api-key", value);
                }
                Err(_) => {
                    tracing::warn!("Semantic Scholar API key contains invalid characters, ignoring")
                }
            }
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(settings.timeout_or(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http: RateLimitedClient::new(
                MetadataSource::SemanticScholar,
                http_client,
                settings.rate_limit_or(DEFAULT_RATE_LIMIT_SECS),
                settings.retry_policy(),
            ),
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
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
                MetadataSource::SemanticScholar,
                transport,
                std::time::Duration::ZERO,
                crate::enrichment::retry::RetryPolicy::none(),
            ),
            base_url: DEFAULT_BASE_URL.to_string(),
            title_threshold,
        }
    }

    /// Resolve one entry: DOI lookup first, title search as fallback.
    ///
    /// Unlike Crossref this index knows about preprints and other
    /// non-registered works, so any non-empty DOI is worth trying.
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

    /// Look up a paper by DOI. `Ok(None)` when the graph has no such paper.
    pub async fn lookup_doi(&self, doi: &str) -> Result<Option<EnrichedMetadata>, SourceError> {
        let url = format!("{}/paper/DOI:{}?fields={}", self.base_url, doi, FIELDS);

        let response = self.http.get(&url).await?;

        if response.status == 404 {
            return Ok(None);
        }
        if response.status == 403 {
            return Err(SourceError::Api(
                "access denied (403), check the API key".to_string(),
            ));
        }
        if !response.is_success() {
            return Err(SourceError::Status {
                status: response.status,
                message: response.body_excerpt(),
            });
        }

        let paper: dto::Paper = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(Some(adapter::to_metadata(paper)))
    }

    /// Relevance search over title plus first author surname, returning
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

        // One free-text query carries both signals; the API has no
        // separate author filter
        let query = match matching::first_author_surname(&entry.authors) {
            Some(surname) => format!("{clean_title} {surname}"),
            None => clean_title,
        };

        let mut url = format!(
            "{}/paper/search?query={}&limit={}&fields={}",
            self.base_url,
            urlencoding::encode(&query),
            SEARCH_LIMIT,
            FIELDS,
        );
        if let Some(year) = entry.year {
            url.push_str(&format!("&year={year}"));
        }

        let response = self.http.get(&url).await?;

        if response.status == 403 {
            return Err(SourceError::Api(
                "access denied (403), check the API key".to_string(),
            ));
        }
        if !response.is_success() {
            return Err(SourceError::Status {
                status: response.status,
                message: response.body_excerpt(),
            });
        }

        let parsed: dto::SearchResponse = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(self.best_match(entry, parsed.data))
    }

    /// Pick the highest-confidence candidate whose title clears the
    /// threshold, recording the confidence on the returned record.
    fn best_match(&self, entry: &BibEntry, papers: Vec<dto::Paper>) -> Option<EnrichedMetadata> {
        let mut best_score = 0.0_f64;
        let mut best_paper: Option<dto::Paper> = None;

        for paper in papers {
            let Some(candidate_title) = paper.title.as_deref() else {
                continue;
            };

            let title_sim = matching::title_similarity(&entry.title, candidate_title);
            if title_sim < self.title_threshold {
                continue;
            }

            let author_sim =
                matching::author_similarity(&entry.authors, &adapter::author_names(&paper.authors));
            let confidence = matching::match_confidence(title_sim, author_sim);

            if confidence > best_score {
                best_score = confidence;
                best_paper = Some(paper);
            }
        }

        best_paper.map(|paper| {
            let mut metadata = adapter::to_metadata(paper);
            metadata.match_score = Some(best_score);
            metadata
        })
    }
}
