//! Bibliography enrichment module - fetches metadata for entries from scholarly APIs.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`crossref/dto.rs`, `openalex/dto.rs`, ...) - Exact API response shapes
//! - **Adapters** - Convert DTOs to domain models
//! - **Clients** - Rate-limited HTTP clients for external APIs
//! - **Cache** - Persistent metadata and discovery-date stores
//! - **Service** - High-level orchestration of the enrichment flow
//!
//! This decoupling means:
//! 1. API changes don't ripple through our codebase
//! 2. We can test API contracts independently
//! 3. We can swap sources without changing business logic
//!
//! # Usage
//!
//! ```ignore
//! use enrichment::EnrichmentService;
//!
//! let config = Config::load();
//! let mut service = EnrichmentService::from_config(&config)?;
//!
//! // Enrich a parsed bibliography
//! let enriched = service.enrich(&entries).await;
//! for (key, metadata) in &enriched {
//!     println!("{key}: {} via {}", metadata.doi.as_deref().unwrap_or("-"), metadata.source);
//! }
//! ```

pub mod domain;
pub mod ids;
pub mod matching;
pub mod retry;
pub mod client;
pub mod cache;
pub mod traits;
pub mod crossref;
pub mod semantic_scholar;
pub mod openalex;
pub mod arxiv;
pub mod service;

pub use domain::{EnrichedMetadata, MetadataSource, SourceError};
pub use cache::{CacheError, CacheStats, DiscoveryCache, MetadataCache};
pub use traits::MetadataProvider;
pub use service::{EnrichmentService, ServiceError};
