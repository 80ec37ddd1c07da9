//! Adapter layer: Convert arXiv Atom entries to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! This isolates API changes - if the feed format changes, only this
//! file and dto.rs need to change.

use super::dto;
use crate::enrichment::domain::{EnrichedMetadata, MetadataSource};

/// Convert a feed entry to an enrichment record.
pub fn to_metadata(entry: dto::Entry) -> EnrichedMetadata {
    let mut metadata = EnrichedMetadata::new(MetadataSource::Arxiv);

    if let Some(doi) = entry.doi.filter(|d| !d.is_empty()) {
        metadata = metadata.with_doi(doi);
    }

    metadata.arxiv_url = Some(entry.id);
    metadata.abstract_text = entry
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    metadata.authors = author_names(&entry.authors);
    metadata.publication_date = entry
        .published
        .map(|date| date.format("%Y-%m-%d").to_string());
    // A journal_ref means the preprint has a published version
    metadata.venue = entry.journal_ref.filter(|j| !j.is_empty());
    metadata.subjects = entry
        .categories
        .into_iter()
        .filter_map(|category| category.term)
        .collect();

    if let Some(pdf_url) = pdf_link(&entry.links) {
        metadata.pdf_url = Some(pdf_url);
        metadata.is_open_access = Some(true);
    }

    metadata
}

/// Author names in listing order.
pub(super) fn author_names(authors: &[dto::Author]) -> Vec<String> {
    authors
        .iter()
        .map(|author| author.name.clone())
        .filter(|name| !name.is_empty())
        .collect()
}

/// The feed tags the PDF alternate with title="pdf".
fn pdf_link(links: &[dto::Link]) -> Option<String> {
    links
        .iter()
        .find(|link| link.title.as_deref() == Some("pdf"))
        .and_then(|link| link.href.clone())
}
