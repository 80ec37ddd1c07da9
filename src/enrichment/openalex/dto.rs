//! OpenAlex API Data Transfer Objects
//!
//! These types match EXACTLY what the OpenAlex API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside this module - convert to domain types.
//!
//! API Reference: https://docs.openalex.org/api-entities/works
//!
//! A single-work lookup returns a bare work object; search returns a
//! page with works under `results`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Response to `GET /works?search=...`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Work>,
    pub meta: Option<Meta>,
}

/// Paging envelope on list responses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Meta {
    /// Matches on the server, not the page size
    pub count: Option<u64>,
}

/// One work (also the entire body of a single-work lookup)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Work {
    /// DOI in full `https://doi.org/...` form
    pub doi: Option<String>,
    pub title: Option<String>,
    /// "YYYY-MM-DD"
    pub publication_date: Option<String>,
    pub cited_by_count: Option<u64>,
    pub referenced_works_count: Option<u64>,
    #[serde(default)]
    pub authorships: Vec<Authorship>,
    pub primary_location: Option<Location>,
    pub open_access: Option<OpenAccess>,
    /// Abstract as {word: [positions]}; null when the publisher withheld
    /// the text
    pub abstract_inverted_index: Option<HashMap<String, Vec<usize>>>,
}

/// One author's attribution on a work
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Authorship {
    pub author: Option<AuthorRecord>,
}

/// The author entity inside an authorship
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthorRecord {
    pub display_name: Option<String>,
}

/// Where the best copy of the work lives
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Location {
    pub source: Option<LocationSource>,
    pub landing_page_url: Option<String>,
}

/// The venue hosting a location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationSource {
    pub display_name: Option<String>,
}

/// Open-access status block
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAccess {
    pub is_oa: Option<bool>,
    pub oa_url: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    /// Test parsing a full work object
    #[test]
    fn test_parse_work() {
        let json = r#"{
            "id": "https://openalex.org/W2741809807",
            "doi": "https://doi.org/10.1234/test",
            "title": "Test Paper",
            "publication_date": "2024-01-15",
            "cited_by_count": 42,
            "referenced_works_count": 31,
            "authorships": [
                {"author": {"id": "https://openalex.org/A1", "display_name": "John Doe"}},
                {"author": {"id": "https://openalex.org/A2", "display_name": "Jane Smith"}}
            ],
            "primary_location": {
                "source": {"display_name": "Nature"},
                "landing_page_url": "https://example.com/paper"
            },
            "open_access": {
                "is_oa": true,
                "oa_url": "https://example.com/paper.pdf"
            },
            "abstract_inverted_index": {"This": [0], "is": [1], "it": [2]}
        }"#;

        let work: Work = serde_json::from_str(json).expect("Should parse work");

        assert_eq!(work.doi.as_deref(), Some("https://doi.org/10.1234/test"));
        assert_eq!(work.title.as_deref(), Some("Test Paper"));
        assert_eq!(work.publication_date.as_deref(), Some("2024-01-15"));
        assert_eq!(work.cited_by_count, Some(42));
        assert_eq!(work.referenced_works_count, Some(31));
        assert_eq!(work.authorships.len(), 2);

        let location = work.primary_location.unwrap();
        assert_eq!(
            location.source.unwrap().display_name.as_deref(),
            Some("Nature")
        );
        assert_eq!(
            location.landing_page_url.as_deref(),
            Some("https://example.com/paper")
        );

        let oa = work.open_access.unwrap();
        assert_eq!(oa.is_oa, Some(true));
        assert_eq!(oa.oa_url.as_deref(), Some("https://example.com/paper.pdf"));

        let index = work.abstract_inverted_index.unwrap();
        assert_eq!(index["is"], vec![1]);
    }

    /// Test parsing a minimal work (most fields null or absent)
    #[test]
    fn test_parse_minimal_work() {
        let json = r#"{"title": "Minimal Paper"}"#;

        let work: Work = serde_json::from_str(json).expect("Should parse minimal work");

        assert_eq!(work.title.as_deref(), Some("Minimal Paper"));
        assert!(work.doi.is_none());
        assert!(work.authorships.is_empty());
        assert!(work.primary_location.is_none());
        assert!(work.abstract_inverted_index.is_none());
    }

    /// Test parsing a work with null inner location and author fields
    #[test]
    fn test_parse_null_inner_objects() {
        let json = r#"{
            "title": "Preprint Only",
            "authorships": [{"author": null}],
            "primary_location": {"source": null, "landing_page_url": null},
            "open_access": {"is_oa": false, "oa_url": null},
            "abstract_inverted_index": null
        }"#;

        let work: Work = serde_json::from_str(json).expect("Should parse nulls");

        assert!(work.authorships[0].author.is_none());
        assert!(work.primary_location.unwrap().source.is_none());
        assert_eq!(work.open_access.unwrap().is_oa, Some(false));
    }

    /// Test parsing a search response page
    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "meta": {"count": 137, "page": 1, "per_page": 10},
            "results": [
                {"doi": "https://doi.org/10.5555/a", "title": "First Hit"},
                {"doi": null, "title": "Second Hit"}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse search");

        assert_eq!(response.meta.unwrap().count, Some(137));
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].title.as_deref(), Some("First Hit"));
        assert!(response.results[1].doi.is_none());
    }
}
