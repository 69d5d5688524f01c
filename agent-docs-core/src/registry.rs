//! Framework registry: display names, priority terms and framework identifiers
//! for known documentation skills.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Everything the formatter needs to know about the skill being indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSpec {
    pub id: String,
    pub display_name: String,
    pub version: String,
    /// Key into the change catalog; falls back to `id` when unset.
    #[serde(default)]
    pub framework: Option<String>,
    /// Ordered priority terms for top-level sections.
    #[serde(default)]
    pub priority: Vec<String>,
}

impl SkillSpec {
    pub fn framework_id(&self) -> &str {
        self.framework.as_deref().unwrap_or(&self.id)
    }
}

/// Registry metadata for one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: String,
    pub display_name: String,
    pub framework: String,
    #[serde(default)]
    pub priority: Vec<String>,
}

impl RegistryEntry {
    fn new(id: &str, display_name: &str, priority: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            framework: id.to_string(),
            priority: priority.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Partial override of a registry entry, e.g. from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryOverride {
    pub display_name: Option<String>,
    pub framework: Option<String>,
    pub priority: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl SkillRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the frameworks known out of the box.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for entry in [
            RegistryEntry::new("nextjs", "Next.js", &["app", "getting-started", "api"]),
            RegistryEntry::new("react", "React", &["learn", "reference"]),
            RegistryEntry::new("vue", "Vue", &["guide", "api"]),
            RegistryEntry::new("svelte", "Svelte", &["svelte", "kit"]),
            RegistryEntry::new("astro", "Astro", &["getting-started", "guides", "reference"]),
        ] {
            registry.insert(entry);
        }
        registry
    }

    pub fn insert(&mut self, entry: RegistryEntry) {
        debug!(skill = %entry.id, "Registered skill");
        self.entries.insert(entry.id.clone(), entry);
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.get(id)
    }

    /// Entry for `id`; unknown ids get a bare entry named after themselves.
    pub fn entry(&self, id: &str) -> RegistryEntry {
        self.get(id).cloned().unwrap_or_else(|| RegistryEntry::new(id, id, &[]))
    }

    /// Merge `ov` into the entry for `id`, creating the entry if needed.
    pub fn apply_override(&mut self, id: &str, ov: RegistryOverride) {
        let mut entry = self.entry(id);
        if let Some(display_name) = ov.display_name {
            entry.display_name = display_name;
        }
        if let Some(framework) = ov.framework {
            entry.framework = framework;
        }
        if let Some(priority) = ov.priority {
            entry.priority = priority;
        }
        info!(skill = %id, display_name = %entry.display_name, "Applied registry override");
        self.insert(entry);
    }

    /// Build the [`SkillSpec`] for `id` at `version`.
    pub fn skill(&self, id: &str, version: &str) -> SkillSpec {
        let entry = self.entry(id);
        SkillSpec {
            id: entry.id,
            display_name: entry.display_name,
            version: version.to_string(),
            framework: Some(entry.framework),
            priority: entry.priority,
        }
    }
}
