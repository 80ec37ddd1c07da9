//! Crossref API Data Transfer Objects
//!
//! These types match EXACTLY what the Crossref API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the crossref module - convert to domain types.
//!
//! API Reference: https://api.crossref.org/swagger-ui/index.html
//!
//! A DOI lookup returns a single work under `message`; the search
//! endpoint returns a page of works under `message.items`.

use serde::{Deserialize, Serialize};

/// Response to `GET /works/{doi}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkResponse {
    pub message: Work,
}

/// Response to `GET /works?query.title=...`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub message: SearchResults,
}

/// One page of search results
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResults {
    #[serde(default)]
    pub items: Vec<Work>,
    /// Matches on the server, not the page size
    #[serde(rename = "total-results")]
    pub total_results: Option<u64>,
}

/// A registered work
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Work {
    /// Registered DOI
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
    /// Title lines (almost always exactly one)
    #[serde(default)]
    pub title: Vec<String>,
    /// Abstract as deposited, frequently wrapped in JATS XML tags
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub author: Vec<Author>,
    /// Venue title lines
    #[serde(default)]
    pub container_title: Vec<String>,
    /// Citations to this work known to Crossref
    pub is_referenced_by_count: Option<u64>,
    /// References this work makes
    pub references_count: Option<u64>,
    #[serde(default)]
    pub subject: Vec<String>,
    pub published_print: Option<PartialDate>,
    pub published_online: Option<PartialDate>,
    /// Relevance score, present in search responses only
    pub score: Option<f64>,
}

/// Work author
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Author {
    pub given: Option<String>,
    pub family: Option<String>,
}

/// Date as Crossref deposits it: year/month/day parts, any suffix of
/// which may be missing or null
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PartialDate {
    #[serde(default)]
    pub date_parts: Vec<Vec<Option<i32>>>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
