/// `load_config` module: Loads a static YAML config, applies environment
/// overrides, and adapts it into the core's strongly-typed config and registry.
///
/// This module is the only place where user-supplied YAML is parsed.
///
/// # Responsibilities
/// - Parse the YAML file into type-safe Rust structs
/// - Apply `AGENT_DOCS_TARGET_BYTES` / `AGENT_DOCS_FORMAT` overrides
/// - Resolve a relative `working_dir` against the config file's directory, so
///   nothing depends on where the binary was started from
/// - Merge per-skill overrides into the built-in framework registry
///
/// # Errors
/// All errors use `anyhow::Error` with context and are surfaced at the CLI boundary.
use agent_docs_core::config::CompressConfig;
use agent_docs_core::format::FormatVariant;
use agent_docs_core::registry::{RegistryOverride, SkillRegistry, SkillSpec};
use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const ENV_TARGET_BYTES: &str = "AGENT_DOCS_TARGET_BYTES";
pub const ENV_FORMAT: &str = "AGENT_DOCS_FORMAT";

/// Manifest used by `--inject` when the config names none.
pub const DEFAULT_MANIFEST: &str = "AGENTS.md";

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub compress: CompressConfig,
    /// Manifest file, relative to the working dir.
    #[serde(default)]
    pub manifest: Option<PathBuf>,
    #[serde(default)]
    pub skills: Vec<SkillSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillSection {
    pub id: String,
    #[serde(deserialize_with = "version_string")]
    pub version: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub priority: Option<Vec<String>>,
}

/// YAML reads `version: 16` as a number; accept it as text.
fn version_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(u64),
        Float(f64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

impl CliConfig {
    /// Built-in registry with this config's per-skill overrides applied.
    pub fn registry(&self) -> SkillRegistry {
        let mut registry = SkillRegistry::builtin();
        for skill in &self.skills {
            let ov = RegistryOverride {
                display_name: skill.display_name.clone(),
                framework: skill.framework.clone(),
                priority: skill.priority.clone(),
            };
            if ov != RegistryOverride::default() || registry.get(&skill.id).is_none() {
                registry.apply_override(&skill.id, ov);
            }
        }
        registry
    }

    /// Skills to compress: all configured ones, or just `only`.
    pub fn skill_specs(&self, only: Option<&str>) -> Result<Vec<SkillSpec>> {
        let registry = self.registry();
        let specs: Vec<SkillSpec> = self
            .skills
            .iter()
            .filter(|s| only.map_or(true, |id| s.id == id))
            .map(|s| registry.skill(&s.id, &s.version))
            .collect();
        if let Some(id) = only {
            if specs.is_empty() {
                error!(skill = id, "Requested skill is not configured");
                bail!("Skill {id:?} is not configured");
            }
        }
        Ok(specs)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.compress
            .working_dir
            .join(self.manifest.as_deref().unwrap_or(Path::new(DEFAULT_MANIFEST)))
    }
}

/// Loads the YAML config at `path` and applies environment overrides.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let mut config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if let Ok(var) = std::env::var(ENV_TARGET_BYTES) {
        match var.parse::<usize>() {
            Ok(bytes) if bytes > 0 => {
                info!(target_bytes = bytes, "Target bytes overridden from env");
                config.compress.target_bytes = bytes;
            }
            _ => {
                error!(var = %var, "{ENV_TARGET_BYTES} must be a positive integer");
                bail!("{ENV_TARGET_BYTES} must be a positive integer, got {var:?}");
            }
        }
    }

    if let Ok(var) = std::env::var(ENV_FORMAT) {
        config.compress.format = match var.trim() {
            "v1" => FormatVariant::V1,
            "v2" => FormatVariant::V2,
            _ => {
                error!(var = %var, "{ENV_FORMAT} must be v1 or v2");
                bail!("{ENV_FORMAT} must be v1 or v2, got {var:?}");
            }
        };
        info!(format = %config.compress.format, "Format overridden from env");
    }

    if config.compress.working_dir.is_relative() {
        let base = path_ref.parent().unwrap_or(Path::new(""));
        config.compress.working_dir = base.join(&config.compress.working_dir);
    }
    config.compress = config.compress.normalized();

    for skill in &config.skills {
        if skill.id.is_empty() {
            error!("Skill entry with empty id");
            bail!("Skill entries must have a non-empty id");
        }
    }
    if config.skills.is_empty() {
        warn!(config_path = ?path_ref, "No skills configured");
    }

    config.compress.trace_loaded();
    info!(
        skills = config.skills.len(),
        manifest = %config.manifest_path().display(),
        "Config loaded and merged successfully"
    );
    Ok(config)
}
