//! Enrichment service - orchestrates cache checks and source lookups
//!
//! This is the high-level API for enriching a bibliography:
//! 1. Record each entry's first-seen date in the discovery cache
//! 2. Serve fresh cache hits without touching the network
//! 3. Ask the enabled sources in priority order, first hit wins
//!    (entries recognized as arXiv preprints consult arXiv first)
//! 4. Persist every new result to the metadata cache
//!
//! A source failing an entry is logged and the next source gets its
//! turn; an entry no source can resolve is simply left unenriched. The
//! only fatal condition is a configuration with no usable sources.

use std::collections::BTreeMap;

use crate::config::{self, Config};
use crate::enrichment::arxiv::ArxivClient;
use crate::enrichment::cache::{DiscoveryCache, MetadataCache};
use crate::enrichment::crossref::CrossrefClient;
use crate::enrichment::domain::{EnrichedMetadata, MetadataSource};
use crate::enrichment::ids;
use crate::enrichment::openalex::OpenAlexClient;
use crate::enrichment::semantic_scholar::SemanticScholarClient;
use crate::enrichment::traits::MetadataProvider;
use crate::model::BibEntry;

/// Errors that stop enrichment before it starts.
///
/// Per-entry lookup failures are never fatal - they are logged and the
/// entry stays unenriched.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("enrichment is enabled but no sources are")]
    NoSourcesEnabled,
}

/// Service for enriching bibliography entries from external sources
pub struct EnrichmentService {
    providers: Vec<Box<dyn MetadataProvider>>,
    metadata_cache: MetadataCache,
    discovery: DiscoveryCache,
    /// Cache-only mode: serve hits, never fetch
    skip_cached: bool,
}

impl EnrichmentService {
    /// Build a service from configuration.
    ///
    /// Sources come up in priority-list order; disabled sources are
    /// skipped and unknown names are logged and ignored. API keys and
    /// contact addresses may arrive via the environment, which wins
    /// over the config file.
    pub fn from_config(cfg: &Config) -> Result<Self, ServiceError> {
        let enrichment = &cfg.enrichment;
        let threshold = enrichment.title_similarity_threshold;

        let mut providers: Vec<Box<dyn MetadataProvider>> = Vec::new();
        for name in &enrichment.source_priority {
            let Some(source) = MetadataSource::parse(name) else {
                tracing::warn!(source = %name, "unknown source in priority list, skipping");
                continue;
            };
            if providers.iter().any(|p| p.source() == source) {
                tracing::warn!(source = %source, "source listed twice in priority list");
                continue;
            }

            match source {
                MetadataSource::Crossref if cfg.sources.crossref.enabled => {
                    providers.push(Box::new(CrossrefClient::new(
                        &cfg.sources.crossref,
                        threshold,
                    )));
                }
                MetadataSource::SemanticScholar if cfg.sources.semantic_scholar.enabled => {
                    let mut settings = cfg.sources.semantic_scholar.clone();
                    settings.api_key = config::env_or(
                        config::SEMANTIC_SCHOLAR_API_KEY_ENV,
                        settings.api_key.as_deref(),
                    );
                    providers.push(Box::new(SemanticScholarClient::new(&settings, threshold)));
                }
                MetadataSource::OpenAlex if cfg.sources.openalex.enabled => {
                    let mut settings = cfg.sources.openalex.clone();
                    settings.mailto =
                        config::env_or(config::OPENALEX_MAILTO_ENV, settings.mailto.as_deref());
                    providers.push(Box::new(OpenAlexClient::new(&settings, threshold)));
                }
                MetadataSource::Arxiv if cfg.sources.arxiv.enabled => {
                    providers.push(Box::new(ArxivClient::new(&cfg.sources.arxiv, threshold)));
                }
                _ => tracing::debug!(source = %source, "source disabled"),
            }
        }

        if providers.is_empty() {
            return Err(ServiceError::NoSourcesEnabled);
        }

        Ok(Self {
            providers,
            metadata_cache: MetadataCache::open(&enrichment.cache_path, enrichment.cache_ttl_days),
            discovery: DiscoveryCache::open(&enrichment.discovery_path),
            skip_cached: enrichment.skip_cached,
        })
    }

    /// Build a service over explicit providers and caches. Tests use
    /// this; production goes through [`Self::from_config`].
    #[cfg(test)]
    fn with_providers(
        providers: Vec<Box<dyn MetadataProvider>>,
        metadata_cache: MetadataCache,
        discovery: DiscoveryCache,
        skip_cached: bool,
    ) -> Self {
        Self {
            providers,
            metadata_cache,
            discovery,
            skip_cached,
        }
    }

    /// The sources this service will consult, in priority order.
    pub fn sources(&self) -> Vec<MetadataSource> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    /// Enrich a batch of entries.
    ///
    /// The returned map holds a key only when metadata was found for it;
    /// entries no source could resolve are absent, not paired with an
    /// error.
    pub async fn enrich(&mut self, entries: &[BibEntry]) -> BTreeMap<String, EnrichedMetadata> {
        let mut enriched = BTreeMap::new();

        for entry in entries {
            match self.enrich_entry(entry).await {
                Some(metadata) => {
                    tracing::info!(
                        entry = %entry.key,
                        source = %metadata.source,
                        "Successfully enriched entry"
                    );
                    enriched.insert(entry.key.clone(), metadata);
                }
                None => tracing::warn!(entry = %entry.key, "Could not enrich entry"),
            }
        }

        tracing::info!(
            enriched = enriched.len(),
            total = entries.len(),
            "enrichment pass complete"
        );
        enriched
    }

    /// Enrich one entry, consulting the cache before any source.
    async fn enrich_entry(&mut self, entry: &BibEntry) -> Option<EnrichedMetadata> {
        if let Err(e) = self.discovery.record(&entry.key) {
            tracing::warn!(entry = %entry.key, error = %e, "failed to record discovery date");
        }

        if let Some(record) = self.metadata_cache.get(&entry.key) {
            tracing::debug!(entry = %entry.key, source = %record.metadata.source, "cache hit");
            return Some(record.metadata.clone());
        }

        if self.skip_cached {
            tracing::debug!(entry = %entry.key, "not cached, skipping in cache-only mode");
            return None;
        }

        let found = self.lookup(entry).await?;
        if let Err(e) = self
            .metadata_cache
            .put(&entry.key, &entry.title, found.clone())
        {
            tracing::warn!(entry = %entry.key, error = %e, "failed to persist cache record");
        }
        Some(found)
    }

    /// Ask each source in turn until one produces a match.
    async fn lookup(&self, entry: &BibEntry) -> Option<EnrichedMetadata> {
        for provider in self.provider_order(entry) {
            match provider.lookup(entry).await {
                Ok(Some(metadata)) => {
                    tracing::debug!(entry = %entry.key, source = %provider.source(), "match found");
                    return Some(metadata);
                }
                Ok(None) => {
                    tracing::debug!(entry = %entry.key, source = %provider.source(), "no match");
                }
                Err(e) => {
                    // One source failing must not cost this entry its
                    // shot at the remaining sources
                    tracing::warn!(
                        entry = %entry.key,
                        source = %provider.source(),
                        error = %e,
                        "source lookup failed"
                    );
                }
            }
        }
        None
    }

    /// Configured priority order, except that arXiv preprints consult
    /// arXiv first - it is the registry guaranteed to know them.
    fn provider_order(&self, entry: &BibEntry) -> Vec<&dyn MetadataProvider> {
        let mut order: Vec<&dyn MetadataProvider> =
            self.providers.iter().map(|p| &**p).collect();

        if ids::is_arxiv_entry(entry) {
            // Stable sort keeps the configured order among the rest
            order.sort_by_key(|p| p.source() != MetadataSource::Arxiv);
        }
        order
    }
}
