//! # contract: seams between the compressor and its collaborators
//!
//! The compressor itself is pure over a directory snapshot. The two things it
//! needs from outside are defined here as traits so that production code,
//! tests, and future integrations can plug in their own implementations:
//!
//! - [`DocsFetcher`] resolves the on-disk cache directory for a skill. Real
//!   fetchers download docs first; the compressor never does network I/O.
//! - [`ChangeCatalog`] supplies the hardcoded per-framework knowledge rendered
//!   by the semantic (v2) format: breaking changes and new APIs per major version.
//!
//! Both traits are annotated for `mockall` so consumers can generate mocks.

use async_trait::async_trait;
use std::path::PathBuf;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Error type for the fetcher boundary (simple boxed error).
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Resolves an already-downloaded documentation cache directory for a skill.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DocsFetcher: Send + Sync {
    /// Return the cache directory holding the docs for `skill_id`.
    ///
    /// The directory is not required to exist; a missing directory compresses
    /// to a header-only index.
    async fn resolve(&self, skill_id: &str) -> Result<PathBuf, FetchError>;
}

/// Source of per-framework release knowledge, keyed by framework identifier and
/// major version.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait ChangeCatalog: Send + Sync {
    /// Breaking changes introduced in `major`, in display order.
    fn breaking_changes(&self, framework: &str, major: u64) -> Vec<String>;

    /// Notable new APIs introduced in `major`, in display order.
    fn new_apis(&self, framework: &str, major: u64) -> Vec<String>;
}
