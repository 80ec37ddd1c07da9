//! arXiv HTTP client
//!
//! Handles communication with the arXiv query API.
//! See: https://info.arxiv.org/help/api/user-manual.html
//!
//! The API takes an id_list for direct lookups and a search_query for
//! everything else, and returns Atom XML either way. arXiv asks for a
//! 3 second gap between requests, enforced here by the shared pacing.

use super::{adapter, dto};
use crate::config::SourceSettings;
use crate::enrichment::client::{RateLimitedClient, USER_AGENT};
use crate::enrichment::domain::{EnrichedMetadata, MetadataSource, SourceError};
use crate::enrichment::{ids, matching};
use crate::model::BibEntry;

const DEFAULT_BASE_URL: &str = "http://export.arxiv.org/api/query";
const DEFAULT_RATE_LIMIT_SECS: f64 = 3.0;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Results requested per search
const MAX_SEARCH_RESULTS: u32 = 10;

/// arXiv API client
pub struct ArxivClient {
    http: RateLimitedClient,
    base_url: String,
    title_threshold: f64,
}

impl ArxivClient {
    /// Create a client, resolving unset settings to arXiv's documented
    /// defaults.
    pub fn new(settings: &SourceSettings, title_threshold: f64) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout_or(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http: RateLimitedClient::new(
                MetadataSource::Arxiv,
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
                MetadataSource::Arxiv,
                transport,
                std::time::Duration::ZERO,
                crate::enrichment::retry::RetryPolicy::none(),
            ),
            base_url: DEFAULT_BASE_URL.to_string(),
            title_threshold,
        }
    }

    /// Resolve one entry: id_list lookup when the entry carries an arXiv
    /// identifier, title search otherwise or when the id draws a blank.
    pub async fn resolve(
        &self,
        entry: &BibEntry,
    ) -> Result<Option<EnrichedMetadata>, SourceError> {
        if let Some(id) = ids::extract_arxiv_id(entry) {
            if let Some(found) = self.lookup_id(&id).await? {
                return Ok(Some(found));
            }
        }

        self.search_title(entry).await
    }

    /// Look up one paper by arXiv id. `Ok(None)` when arXiv does not know
    /// the id (the API reports that as an error entry, not a 404).
    pub async fn lookup_id(&self, id: &str) -> Result<Option<EnrichedMetadata>, SourceError> {
        let url = format!("{}?id_list={}&max_results=1", self.base_url, id);

        let feed = self.fetch_feed(&url).await?;

        Ok(feed
            .entries
            .into_iter()
            .next()
            .filter(|entry| !entry.id.contains("api/errors"))
            .map(adapter::to_metadata))
    }

    /// Search by title, returning the best candidate that clears the
    /// similarity threshold.
    ///
    /// A quoted phrase query goes out first; when it matches nothing the
    /// search is repeated unquoted, which trades precision for recall.
    pub async fn search_title(
        &self,
        entry: &BibEntry,
    ) -> Result<Option<EnrichedMetadata>, SourceError> {
        let clean_title = matching::clean_title_for_search(&entry.title);
        if clean_title.len() < matching::MIN_SEARCH_TITLE_LEN {
            tracing::debug!(entry = %entry.key, "title too short for reliable search");
            return Ok(None);
        }

        let quoted = format!("ti:\"{clean_title}\"");
        let mut feed = self.search(&quoted).await?;

        if feed.entries.is_empty() {
            let unquoted = format!("ti:{clean_title}");
            feed = self.search(&unquoted).await?;
        }

        Ok(self.best_match(entry, feed.entries))
    }

    async fn search(&self, query: &str) -> Result<dto::Feed, SourceError> {
        let url = format!(
            "{}?search_query={}&max_results={}",
            self.base_url,
            urlencoding::encode(query),
            MAX_SEARCH_RESULTS,
        );

        self.fetch_feed(&url).await
    }

    async fn fetch_feed(&self, url: &str) -> Result<dto::Feed, SourceError> {
        let response = self.http.get(url).await?;

        if !response.is_success() {
            return Err(SourceError::Status {
                status: response.status,
                message: response.body_excerpt(),
            });
        }

        quick_xml::de::from_str(&response.body).map_err(|e| SourceError::Parse(e.to_string()))
    }

    /// Pick the highest-confidence candidate whose title clears the
    /// threshold, recording the confidence on the returned record.
    fn best_match(&self, entry: &BibEntry, entries: Vec<dto::Entry>) -> Option<EnrichedMetadata> {
        let mut best_score = 0.0_f64;
        let mut best_entry: Option<dto::Entry> = None;

        for candidate in entries {
            let Some(candidate_title) = candidate.title.as_deref() else {
                continue;
            };

            let title_sim = matching::title_similarity(&entry.title, candidate_title);
            if title_sim < self.title_threshold {
                continue;
            }

            let author_sim = matching::author_similarity(
                &entry.authors,
                &adapter::author_names(&candidate.authors),
            );
            let confidence = matching::match_confidence(title_sim, author_sim);

            if confidence > best_score {
                best_score = confidence;
                best_entry = Some(candidate);
            }
        }

        best_entry.map(|candidate| {
            let mut metadata = adapter::to_metadata(candidate);
            metadata.match_score = Some(best_score);
            metadata
        })
    }
}
