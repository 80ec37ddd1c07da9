//! Top-level error types for the binary.
//!
//! The enrichment modules each define their own `thiserror` enums
//! ([`SourceError`], [`CacheError`], [`ConfigError`], [`ServiceError`]);
//! this module aggregates them for code that crosses subsystem lines,
//! such as loading a bibliography and opening its caches in one call
//! chain. CLI entry points convert the lot into `anyhow` at the edge.
//!
//! # Example
//!
//! ```ignore
//! use bib_enrich::error::{Result, ResultExt};
//!
//! fn load(path: &Path) -> Result<Vec<BibEntry>> {
//!     model::load_entries(path).with_context("loading bibliography")
//! }
//! ```
//!
//! [`SourceError`]: crate::enrichment::SourceError
//! [`CacheError`]: crate::enrichment::CacheError
//! [`ConfigError`]: crate::config::ConfigError
//! [`ServiceError`]: crate::enrichment::ServiceError

use std::path::PathBuf;

/// Result alias over the aggregate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure the pipeline can surface to the CLI.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem failure outside the cache layer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bibliography file exists but does not hold what we expect
    #[error("Invalid input file {path}: {message}")]
    Input { path: PathBuf, message: String },

    /// Metadata or discovery cache failure
    #[error("Cache error: {0}")]
    Cache(#[from] crate::enrichment::CacheError),

    /// Configuration load/save failure
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Enrichment service failure
    #[error("Enrichment error: {0}")]
    Enrichment(#[from] crate::enrichment::ServiceError),

    /// Input path does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Any of the above, wrapped with what the caller was doing
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Invalid-input error for the given file.
    pub fn input(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Input {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Missing-file error for the given path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Wrap this error with a description of the operation in progress.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Adds `.with_context(...)` to results carrying convertible errors.
pub trait ResultExt<T> {
    /// Wrap the error side with a description of the operation.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}
