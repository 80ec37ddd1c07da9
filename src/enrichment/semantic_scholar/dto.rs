//! Semantic Scholar API Data Transfer Objects
//!
//! These types match EXACTLY what the Academic Graph API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside this module - convert to domain types.
//!
//! API Reference: https://api.semanticscholar.org/api-docs/
//!
//! A DOI lookup returns a bare paper object; search returns a page with
//! papers under `data`.

use serde::{Deserialize, Serialize};

/// Response to `GET /paper/search`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<Paper>,
    /// Matches on the server, not the page size
    pub total: Option<u64>,
}

/// One paper (also the entire body of a `GET /paper/DOI:{doi}` response)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub paper_id: Option<String>,
    pub title: Option<String>,
    /// Abstract text; null for a large share of the corpus
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub authors: Vec<Author>,
    /// Venue name; empty string when unknown
    pub venue: Option<String>,
    pub year: Option<i32>,
    pub citation_count: Option<u64>,
    pub reference_count: Option<u64>,
    pub external_ids: Option<ExternalIds>,
    /// Semantic Scholar's own paper page
    pub url: Option<String>,
    pub open_access_pdf: Option<OpenAccessPdf>,
}

/// Paper author
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub author_id: Option<String>,
    pub name: Option<String>,
}

/// Identifiers in other registries
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExternalIds {
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
    #[serde(rename = "ArXiv")]
    pub arxiv: Option<String>,
}

/// Open-access PDF pointer
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAccessPdf {
    pub url: Option<String>,
    pub status: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    /// Test parsing a full DOI lookup response
    #[test]
    fn test_parse_paper_lookup() {
        let json = r#"{
            "paperId": "df2b0e26d0599ce3e70df8a9da02e51594e0e992",
            "externalIds": {"DOI": "10.1038/nature14539", "ArXiv": "1404.7828", "CorpusId": 3074096},
            "url": "https://www.semanticscholar.org/paper/df2b0e26d0599ce3e70df8a9da02e51594e0e992",
            "title": "Deep learning",
            "abstract": "Deep learning allows computational models...",
            "venue": "Nature",
            "year": 2015,
            "citationCount": 46912,
            "referenceCount": 103,
            "openAccessPdf": {"url": "https://europepmc.org/articles/pmc5427785", "status": "GREEN"},
            "authors": [
                {"authorId": "1688882", "name": "Yann LeCun"},
                {"authorId": "1751762", "name": "Yoshua Bengio"}
            ]
        }"#;

        let paper: Paper = serde_json::from_str(json).expect("Should parse paper lookup");

        assert_eq!(paper.title.as_deref(), Some("Deep learning"));
        assert_eq!(paper.year, Some(2015));
        assert_eq!(paper.citation_count, Some(46912));
        assert_eq!(paper.reference_count, Some(103));
        assert_eq!(paper.authors.len(), 2);
        assert_eq!(paper.authors[0].name.as_deref(), Some("Yann LeCun"));

        let ids = paper.external_ids.unwrap();
        assert_eq!(ids.doi.as_deref(), Some("10.1038/nature14539"));
        assert_eq!(ids.arxiv.as_deref(), Some("1404.7828"));

        let pdf = paper.open_access_pdf.unwrap();
        assert_eq!(pdf.url.as_deref(), Some("https://europepmc.org/articles/pmc5427785"));
        assert_eq!(pdf.status.as_deref(), Some("GREEN"));
    }

    /// Test parsing a sparse paper (nulls everywhere is the common case)
    #[test]
    fn test_parse_sparse_paper() {
        let json = r#"{
            "paperId": "abc",
            "title": "An Obscure Workshop Paper",
            "abstract": null,
            "venue": "",
            "year": null,
            "citationCount": 0,
            "openAccessPdf": null,
            "externalIds": {}
        }"#;

        let paper: Paper = serde_json::from_str(json).expect("Should parse sparse paper");

        assert!(paper.abstract_text.is_none());
        assert_eq!(paper.venue.as_deref(), Some(""));
        assert!(paper.year.is_none());
        // Zero citations is data, not absence
        assert_eq!(paper.citation_count, Some(0));
        assert!(paper.open_access_pdf.is_none());

        let ids = paper.external_ids.unwrap();
        assert!(ids.doi.is_none());
        assert!(ids.arxiv.is_none());
    }

    /// Test parsing a search response page
    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "total": 15117,
            "offset": 0,
            "data": [
                {"paperId": "p1", "title": "Attention Is All You Need", "year": 2017},
                {"paperId": "p2", "title": "Attention Is Off By One", "year": 2023}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse search");

        assert_eq!(response.total, Some(15117));
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].title.as_deref(), Some("Attention Is All You Need"));
    }

    /// Test parsing an empty search result
    #[test]
    fn test_parse_empty_search() {
        let json = r#"{"total": 0, "offset": 0, "data": []}"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse empty search");

        assert!(response.data.is_empty());
    }
}
