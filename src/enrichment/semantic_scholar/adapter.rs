//! Adapter layer: Convert Semantic Scholar DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! This isolates API changes - if the Academic Graph changes its response
//! format, only this file and dto.rs need to change.

use super::dto;
use crate::enrichment::domain::{EnrichedMetadata, MetadataSource};

/// Convert a paper to an enrichment record.
pub fn to_metadata(paper: dto::Paper) -> EnrichedMetadata {
    let mut metadata = EnrichedMetadata::new(MetadataSource::SemanticScholar);

    if let Some(ids) = &paper.external_ids {
        if let Some(doi) = &ids.doi {
            metadata = metadata.with_doi(doi.clone());
        }
        if let Some(arxiv_id) = &ids.arxiv {
            metadata.arxiv_url = Some(format!("https://arxiv.org/abs/{arxiv_id}"));
        }
    }

    metadata.abstract_text = paper.abstract_text.filter(|a| !a.is_empty());
    metadata.authors = author_names(&paper.authors);
    metadata.publication_date = paper.year.map(|y| y.to_string());
    // The API reports unknown venues as "" rather than null
    metadata.venue = paper.venue.filter(|v| !v.is_empty());
    metadata.citation_count = paper.citation_count;
    metadata.reference_count = paper.reference_count;
    metadata.url = paper.url;

    if let Some(pdf_url) = paper.open_access_pdf.and_then(|pdf| pdf.url) {
        metadata.pdf_url = Some(pdf_url);
        metadata.is_open_access = Some(true);
    }

    metadata
}

/// Author display names in listing order, skipping unnamed records.
pub(super) fn author_names(authors: &[dto::Author]) -> Vec<String> {
    authors
        .iter()
        .filter_map(|author| author.name.clone())
        .filter(|name| !name.is_empty())
        .collect()
}
