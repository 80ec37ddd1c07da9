//! arXiv API integration
//!
//! arXiv is the canonical source for preprints: when an entry carries an
//! arXiv identifier this is the one registry guaranteed to know it, and
//! the enricher consults it ahead of everything else for such entries.
//! The API speaks Atom XML rather than JSON and asks for a 3 second gap
//! between requests.
//!
//! API docs: https://info.arxiv.org/help/api/user-manual.html

pub mod dto;
mod adapter;
mod client;

pub use client::ArxivClient;
