//! Adapter layer: Convert OpenAlex DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! This isolates API changes - if OpenAlex changes its response format,
//! only this file and dto.rs need to change.

use std::collections::HashMap;

use super::dto;
use crate::enrichment::domain::{EnrichedMetadata, MetadataSource};
use crate::enrichment::ids;

/// Convert a work to an enrichment record.
pub fn to_metadata(work: dto::Work) -> EnrichedMetadata {
    let mut metadata = EnrichedMetadata::new(MetadataSource::OpenAlex);

    if let Some(raw) = &work.doi {
        let doi = ids::clean_doi(raw);
        if !doi.is_empty() {
            metadata = metadata.with_doi(doi);
        }
    }

    metadata.abstract_text = work
        .abstract_inverted_index
        .as_ref()
        .and_then(reconstruct_abstract);
    metadata.authors = author_names(&work.authorships);
    metadata.publication_date = work.publication_date;
    metadata.citation_count = work.cited_by_count;
    metadata.reference_count = work.referenced_works_count;

    if let Some(location) = work.primary_location {
        metadata.venue = location.source.and_then(|source| source.display_name);
        metadata.url = location.landing_page_url;
    }

    if let Some(oa) = work.open_access {
        metadata.is_open_access = oa.is_oa;
        metadata.pdf_url = oa.oa_url;
    }

    metadata
}

/// Rebuild abstract text from OpenAlex's inverted index.
///
/// The index maps each word to every position it occupies in the
/// abstract; sorting the (position, word) pairs recovers the original
/// word order. An empty index means no abstract.
pub(super) fn reconstruct_abstract(index: &HashMap<String, Vec<usize>>) -> Option<String> {
    if index.is_empty() {
        return None;
    }

    let mut positions: Vec<(usize, &str)> = Vec::new();
    for (word, offsets) in index {
        for &offset in offsets {
            positions.push((offset, word.as_str()));
        }
    }
    positions.sort_unstable_by_key(|&(position, _)| position);

    Some(
        positions
            .into_iter()
            .map(|(_, word)| word)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Author display names in listing order, skipping dangling authorships.
pub(super) fn author_names(authorships: &[dto::Authorship]) -> Vec<String> {
    authorships
        .iter()
        .filter_map(|authorship| authorship.author.as_ref()?.display_name.clone())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_full_work() {
        let json = r#"{
            "doi": "https://doi.org/10.1234/test",
            "title": "Test Paper",
            "publication_date": "2024-01-15",
            "cited_by_count": 42,
            "authorships": [
                {"author": {"display_name": "John Doe"}},
                {"author": {"display_name": "Jane Smith"}}
            ],
            "primary_location": {
                "source": {"display_name": "Nature"},
                "landing_page_url": "https://example.com/paper"
            },
            "open_access": {
                "is_oa": true,
                "oa_url": "https://example.com/paper.pdf"
            }
        }"#;
        let work: dto::Work = serde_json::from_str(json).unwrap();

        let metadata = to_metadata(work);

        assert_eq!(metadata.source, MetadataSource::OpenAlex);
        assert_eq!(metadata.doi.as_deref(), Some("10.1234/test"));
        assert_eq!(
            metadata.doi_url.as_deref(),
            Some("https://doi.org/10.1234/test")
        );
        assert_eq!(metadata.publication_date.as_deref(), Some("2024-01-15"));
        assert_eq!(metadata.citation_count, Some(42));
        assert_eq!(metadata.authors, vec!["John Doe", "Jane Smith"]);
        assert_eq!(metadata.venue.as_deref(), Some("Nature"));
        assert_eq!(metadata.url.as_deref(), Some("https://example.com/paper"));
        assert_eq!(metadata.is_open_access, Some(true));
        assert_eq!(
            metadata.pdf_url.as_deref(),
            Some("https://example.com/paper.pdf")
        );
    }

    #[test]
    fn test_maps_minimal_work() {
        let work: dto::Work = serde_json::from_str(r#"{"title": "Minimal Paper"}"#).unwrap();

        let metadata = to_metadata(work);

        assert_eq!(metadata.source, MetadataSource::OpenAlex);
        assert!(metadata.doi.is_none());
        assert!(metadata.authors.is_empty());
        assert!(metadata.venue.is_none());
        assert!(metadata.abstract_text.is_none());
    }

    #[test]
    fn test_reconstructs_abstract_in_position_order() {
        let index = HashMap::from([
            ("This".to_string(), vec![0]),
            ("is".to_string(), vec![1]),
            ("a".to_string(), vec![2]),
            ("test".to_string(), vec![3]),
            ("abstract".to_string(), vec![4]),
        ]);

        assert_eq!(
            reconstruct_abstract(&index).as_deref(),
            Some("This is a test abstract")
        );
    }

    #[test]
    fn test_reconstruction_handles_repeated_words() {
        let index = HashMap::from([
            ("the".to_string(), vec![0, 3]),
            ("cat".to_string(), vec![1]),
            ("chased".to_string(), vec![2]),
            ("dog".to_string(), vec![4]),
        ]);

        assert_eq!(
            reconstruct_abstract(&index).as_deref(),
            Some("the cat chased the dog")
        );
    }

    #[test]
    fn test_empty_index_yields_no_abstract() {
        assert!(reconstruct_abstract(&HashMap::new()).is_none());
    }

    #[test]
    fn test_dangling_authorship_is_skipped() {
        let json = r#"{
            "title": "Partial Attribution",
            "authorships": [
                {"author": null},
                {"author": {"display_name": "Jane Smith"}}
            ]
        }"#;
        let work: dto::Work = serde_json::from_str(json).unwrap();

        assert_eq!(to_metadata(work).authors, vec!["Jane Smith"]);
    }
}
