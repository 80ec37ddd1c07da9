//! The common lookup capability all source integrations implement.
//!
//! The orchestrator iterates an ordered list of `dyn MetadataProvider`s,
//! so adding a source means implementing this trait and registering the
//! client - no orchestrator changes. Tests substitute scripted mock
//! providers to pin down fallback ordering and failure isolation.

use async_trait::async_trait;

use super::domain::{EnrichedMetadata, MetadataSource, SourceError};
use crate::model::BibEntry;

/// One external metadata source.
///
/// `lookup` resolves an entry against the source: identifier lookup when
/// the entry carries one, free-text title search otherwise. `Ok(None)`
/// means the source has no acceptable match - an expected outcome, not a
/// failure. `Err` is reserved for transport and protocol faults.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Identifier of this source, used for priority lists and logging.
    fn source(&self) -> MetadataSource;

    /// Resolve one entry against this source.
    async fn lookup(&self, entry: &BibEntry) -> Result<Option<EnrichedMetadata>, SourceError>;
}

// Real client implementations live with their modules:
//   crossref::CrossrefClient, semantic_scholar::SemanticScholarClient,
//   openalex::OpenAlexClient, arxiv::ArxivClient

#[async_trait]
impl MetadataProvider for super::crossref::CrossrefClient {
    fn source(&self) -> MetadataSource {
        MetadataSource::Crossref
    }

    async fn lookup(&self, entry: &BibEntry) -> Result<Option<EnrichedMetadata>, SourceError> {
        self.resolve(entry).await
    }
}

#[async_trait]
impl MetadataProvider for super::semantic_scholar::SemanticScholarClient {
    fn source(&self) -> MetadataSource {
        MetadataSource::SemanticScholar
    }

    async fn lookup(&self, entry: &BibEntry) -> Result<Option<EnrichedMetadata>, SourceError> {
        self.resolve(entry).await
    }
}

#[async_trait]
impl MetadataProvider for super::openalex::OpenAlexClient {
    fn source(&self) -> MetadataSource {
        MetadataSource::OpenAlex
    }

    async fn lookup(&self, entry: &BibEntry) -> Result<Option<EnrichedMetadata>, SourceError> {
        self.resolve(entry).await
    }
}

#[async_trait]
impl MetadataProvider for super::arxiv::ArxivClient {
    fn source(&self) -> MetadataSource {
        MetadataSource::Arxiv
    }

    async fn lookup(&self, entry: &BibEntry) -> Result<Option<EnrichedMetadata>, SourceError> {
        self.resolve(entry).await
    }
}
