//! High-level pipeline: tree → prioritize → render → enforce.
//!
//! This module ties the compressor stages together for one skill
//! ([`compress_index`]) and for many skills at once ([`compress_all`]).
//!
//! # Responsibilities
//! - Build a fresh tree for every call; nothing is cached between calls
//! - Absorb missing docs, unreadable files and over-budget output (see
//!   [`crate::enforce`]); none of these are errors
//! - Report how much smaller the index is than the docs it summarises
//!   ([`compression_stats`])
//!
//! # Concurrency
//! [`compress_all`] resolves and compresses skills concurrently, each on its own
//! blocking task over its own directory snapshot, and returns results in request
//! order.

use futures::future::try_join_all;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::CompressConfig;
use crate::contract::{ChangeCatalog, DocsFetcher};
use crate::enforce::{enforce_size_with_report, DEFAULT_TARGET_BYTES};
use crate::format::{neutralize_comment_markers, FormatVariant};
use crate::prioritize::prioritize;
use crate::registry::SkillSpec;
use crate::tree::build_tree;

/// Per-call options for [`compress_index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressOptions {
    pub cache_dir: PathBuf,
    pub format: FormatVariant,
    /// Byte budget; 0 means [`DEFAULT_TARGET_BYTES`].
    pub target_bytes: usize,
}

impl CompressOptions {
    pub fn new(cache_dir: impl AsRef<Path>, format: FormatVariant) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
            format,
            target_bytes: DEFAULT_TARGET_BYTES,
        }
    }

    pub fn with_target_bytes(mut self, target_bytes: usize) -> Self {
        self.target_bytes = target_bytes;
        self
    }
}

/// Size comparison between the raw docs and their index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressionStats {
    pub original_size: u64,
    pub compressed_size: u64,
    /// 0-100; 0 when there are no docs.
    pub reduction_percent: u8,
}

/// Result of compressing one skill in [`compress_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedIndex {
    pub skill: SkillSpec,
    pub cache_dir: PathBuf,
    pub index: String,
    pub stats: CompressionStats,
}

#[derive(Debug)]
pub enum CompressError {
    Io(std::io::Error),
    Fetch(String),
    Join(String),
}

impl fmt::Display for CompressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressError::Io(e) => write!(f, "io error: {e}"),
            CompressError::Fetch(msg) => write!(f, "fetch failed: {msg}"),
            CompressError::Join(msg) => write!(f, "compression task failed: {msg}"),
        }
    }
}

impl std::error::Error for CompressError {}

impl From<std::io::Error> for CompressError {
    fn from(e: std::io::Error) -> Self {
        CompressError::Io(e)
    }
}

/// Compress the docs under `options.cache_dir` into an index for `skill`.
///
/// Never fails: a missing or empty cache yields the header lines only, and an
/// index that cannot be squeezed under budget is returned as is.
pub fn compress_index(
    skill: &SkillSpec,
    options: &CompressOptions,
    catalog: &dyn ChangeCatalog,
) -> String {
    let format = options.format;
    let tree = build_tree(&options.cache_dir, format.extracts_content());
    let tree = prioritize(tree, &skill.priority);
    let rendered = format.render(skill, &tree, &options.cache_dir, catalog);

    let (index, report) =
        enforce_size_with_report(&rendered, options.target_bytes, format.header_floor());
    if !report.within_budget {
        warn!(
            skill = %skill.id,
            bytes = index.len(),
            target = options.target_bytes,
            "Index exceeds budget after compression"
        );
    }
    info!(
        skill = %skill.id,
        format = %format,
        rendered = rendered.len(),
        bytes = index.len(),
        passes = report.passes_applied,
        lines_dropped = report.lines_dropped,
        "Compressed docs index"
    );
    neutralize_comment_markers(&index)
}

/// Compare the raw size of the docs under `cache_dir` with `index`.
pub fn compression_stats(cache_dir: &Path, index: &str) -> CompressionStats {
    let original_size = docs_size(cache_dir);
    let compressed_size = index.len() as u64;
    let reduction_percent = if original_size == 0 || compressed_size >= original_size {
        0
    } else {
        let ratio = 1.0 - compressed_size as f64 / original_size as f64;
        (ratio * 100.0).round().clamp(0.0, 100.0) as u8
    };
    CompressionStats {
        original_size,
        compressed_size,
        reduction_percent,
    }
}

/// Total size of all non-dot regular files under `dir`; 0 if it cannot be read.
///
/// Symlinks are not followed, matching what the tree builder treats as part
/// of the cache.
fn docs_size(dir: &Path) -> u64 {
    let Ok(read) = fs::read_dir(dir) else {
        return 0;
    };
    read.filter_map(Result::ok)
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| match entry.file_type() {
            Ok(t) if t.is_dir() => docs_size(&entry.path()),
            Ok(t) if t.is_file() => entry.metadata().map(|m| m.len()).unwrap_or(0),
            _ => 0,
        })
        .sum()
}

/// Compress every skill in `skills`, resolving cache dirs through `fetcher`.
///
/// Fails fast on the first fetch or task failure.
pub async fn compress_all<F>(
    skills: Vec<SkillSpec>,
    fetcher: &F,
    catalog: Arc<dyn ChangeCatalog>,
    config: &CompressConfig,
) -> Result<Vec<CompressedIndex>, CompressError>
where
    F: DocsFetcher + ?Sized,
{
    info!(skills = skills.len(), format = %config.format, "Compressing docs indexes");

    let jobs = skills.into_iter().map(|skill| {
        let catalog = Arc::clone(&catalog);
        let format = config.format;
        let target_bytes = config.target_bytes;
        async move {
            let cache_dir = fetcher.resolve(&skill.id).await.map_err(|e| {
                error!(skill = %skill.id, error = ?e, "Failed to resolve docs cache");
                CompressError::Fetch(format!("{}: {e}", skill.id))
            })?;
            debug!(skill = %skill.id, cache_dir = %cache_dir.display(), "Resolved cache dir");

            tokio::task::spawn_blocking(move || {
                let options = CompressOptions {
                    cache_dir: cache_dir.clone(),
                    format,
                    target_bytes,
                };
                let index = compress_index(&skill, &options, catalog.as_ref());
                let stats = compression_stats(&cache_dir, &index);
                CompressedIndex {
                    skill,
                    cache_dir,
                    index,
                    stats,
                }
            })
            .await
            .map_err(|e| {
                error!(error = ?e, "Compression task panicked or was cancelled");
                CompressError::Join(e.to_string())
            })
        }
    });

    let results = try_join_all(jobs).await?;
    info!(count = results.len(), "All docs indexes compressed");
    Ok(results)
}
