//! OpenAlex API integration
//!
//! OpenAlex indexes works across every discipline with no API key and
//! generous rate limits, which makes it a good backstop when the more
//! specialized registries come up empty. Its one quirk: abstracts are
//! published as an inverted index and have to be reconstructed word by
//! word. Supplying a mailto routes requests through the faster
//! "polite" pool.
//!
//! API docs: https://docs.openalex.org/

pub mod dto;
mod adapter;
mod client;

pub use client::OpenAlexClient;
