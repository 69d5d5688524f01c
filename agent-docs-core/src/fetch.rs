use std::path::PathBuf;

use crate::config::CompressConfig;
use crate::contract::{DocsFetcher, FetchError};

/// Resolves cache roots that a previous fetch left under the configured working
/// directory. Performs no network I/O.
pub struct LocalCacheFetcher {
    config: CompressConfig,
}

impl LocalCacheFetcher {
    pub fn new(config: CompressConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl DocsFetcher for LocalCacheFetcher {
    async fn resolve(&self, skill_id: &str) -> Result<PathBuf, FetchError> {
        if skill_id.is_empty() || skill_id.contains(['/', '\\']) || skill_id == ".." {
            return Err(format!("invalid skill id {skill_id:?}").into());
        }
        let path = self.config.cache_root(skill_id);
        if path.is_dir() {
            tracing::debug!(skill = skill_id, path = %path.display(), "Resolved docs cache");
        } else {
            tracing::warn!(
                skill = skill_id,
                path = %path.display(),
                "Docs cache missing, index will contain headers only"
            );
        }
        Ok(path)
    }
}
