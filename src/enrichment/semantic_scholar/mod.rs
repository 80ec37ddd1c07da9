//! Semantic Scholar API integration
//!
//! The Academic Graph covers computer science and adjacent fields with
//! clean abstracts, citation counts and cross-registry identifiers, so it
//! often fills what Crossref deposits leave blank. Works without an API
//! key but throttles hard; a key from the config or environment lifts
//! the limits.
//!
//! API docs: https://api.semanticscholar.org/api-docs/

pub mod dto;
mod adapter;
mod client;

pub use client::SemanticScholarClient;
