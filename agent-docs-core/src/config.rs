use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::enforce::DEFAULT_TARGET_BYTES;
use crate::format::FormatVariant;

/// Directory (under the working dir) that holds one cache root per skill.
pub const CACHE_DIR_NAME: &str = ".agent-docs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressConfig {
    /// Base directory for cache roots. Never taken from the process cwd.
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
    #[serde(default)]
    pub format: FormatVariant,
    #[serde(default = "default_target_bytes")]
    pub target_bytes: usize,
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_target_bytes() -> usize {
    DEFAULT_TARGET_BYTES
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            format: FormatVariant::default(),
            target_bytes: DEFAULT_TARGET_BYTES,
        }
    }
}

impl CompressConfig {
    pub fn new(working_dir: impl AsRef<Path>, format: FormatVariant, target_bytes: usize) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            format,
            target_bytes,
        }
        .normalized()
    }

    /// Replace a zero budget with the default.
    pub fn normalized(mut self) -> Self {
        if self.target_bytes == 0 {
            self.target_bytes = DEFAULT_TARGET_BYTES;
        }
        self
    }

    /// `{working_dir}/.agent-docs/{skill_id}`
    pub fn cache_root(&self, skill_id: &str) -> PathBuf {
        self.working_dir.join(CACHE_DIR_NAME).join(skill_id)
    }

    pub fn trace_loaded(&self) {
        info!(
            working_dir = %self.working_dir.display(),
            format = %self.format,
            target_bytes = self.target_bytes,
            "Loaded CompressConfig"
        );
        debug!(?self, "CompressConfig loaded (full debug)");
    }
}
