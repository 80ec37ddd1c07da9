//! arXiv Atom feed Data Transfer Objects
//!
//! These types match EXACTLY what the arXiv API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside this module - convert to domain types.
//!
//! API Reference: https://info.arxiv.org/help/api/user-manual.html
//!
//! Responses are Atom XML. quick-xml maps repeated child elements onto
//! Vec fields and `@`-prefixed names onto attributes; the `arxiv:`
//! extension elements are matched by their local names, since quick-xml's
//! serde deserializer strips namespace prefixes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The Atom feed envelope; both id lookups and searches return one.
#[derive(Debug, Clone, Deserialize)]
pub struct Feed {
    #[serde(rename = "entry", default)]
    pub entries: Vec<Entry>,
}

/// One paper in the feed
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    /// Versioned abstract page URL, e.g. "http://arxiv.org/abs/1706.03762v7".
    /// For malformed queries the API returns 200 with an error entry whose
    /// id points under api/errors.
    pub id: String,
    pub title: Option<String>,
    /// Abstract, with the feed's leading/trailing whitespace intact
    pub summary: Option<String>,
    pub published: Option<DateTime<Utc>>,
    #[serde(rename = "author", default)]
    pub authors: Vec<Author>,
    #[serde(rename = "link", default)]
    pub links: Vec<Link>,
    #[serde(rename = "category", default)]
    pub categories: Vec<Category>,
    /// Present once a version of record exists (the `arxiv:doi` element)
    pub doi: Option<String>,
    /// The `arxiv:journal_ref` element
    pub journal_ref: Option<String>,
}

/// Paper author
#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub name: String,
}

/// Alternate/related link; the PDF link is tagged with title="pdf"
#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    #[serde(rename = "@href")]
    pub href: Option<String>,
    #[serde(rename = "@rel")]
    pub rel: Option<String>,
    #[serde(rename = "@title")]
    pub title: Option<String>,
}

/// Subject classification
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    #[serde(rename = "@term")]
    pub term: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
