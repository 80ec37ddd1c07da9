//! Crossref API integration
//!
//! Crossref is the DOI registration agency for most journal literature,
//! so it resolves DOIs authoritatively and offers bibliographic search
//! for entries that carry none.
//!
//! API docs: https://api.crossref.org/swagger-ui/index.html

pub mod dto;
mod adapter;
mod client;

pub use client::CrossrefClient;
