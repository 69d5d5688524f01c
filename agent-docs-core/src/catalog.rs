//! Static [`ChangeCatalog`] backed by an in-memory table.

use std::collections::BTreeMap;
use tracing::debug;

use crate::contract::ChangeCatalog;

/// Breaking changes and new APIs for one (framework, major) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub breaking: Vec<String>,
    pub new_apis: Vec<String>,
}

/// Table-driven change catalog. Start from [`StaticChangeCatalog::builtin`] or
/// [`StaticChangeCatalog::empty`] and extend with [`StaticChangeCatalog::with_entry`].
#[derive(Debug, Clone, Default)]
pub struct StaticChangeCatalog {
    entries: BTreeMap<(String, u64), ChangeSet>,
}

impl StaticChangeCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Knowledge shipped with the tool.
    pub fn builtin() -> Self {
        Self::empty()
            .with_entry(
                "nextjs",
                15,
                &[
                    "cookies()/headers()/draftMode() are now async",
                    "fetch() and GET route handlers are no longer cached by default",
                    "params and searchParams are now Promises",
                ],
                &[
                    "after()",
                    "connection()",
                    "<Form> component",
                    "instrumentation.ts onRequestError",
                ],
            )
            .with_entry(
                "nextjs",
                16,
                &[
                    "cookies()/headers() are now async",
                    "params and searchParams must be awaited",
                    "middleware.ts renamed to proxy.ts",
                    "next lint removed, use eslint directly",
                ],
                &[
                    "\"use cache\" directive",
                    "cacheLife()",
                    "cacheTag()",
                    "updateTag()",
                    "refresh()",
                    "Turbopack as default bundler",
                ],
            )
            .with_entry(
                "react",
                19,
                &[
                    "ref is a regular prop, forwardRef no longer needed",
                    "propTypes and defaultProps on functions removed",
                    "ReactDOM.render removed, use createRoot",
                ],
                &[
                    "use()",
                    "useActionState()",
                    "useOptimistic()",
                    "useFormStatus()",
                    "<Context> as provider",
                ],
            )
            .with_entry(
                "vue",
                3,
                &[
                    "createApp() replaces new Vue()",
                    "filters removed",
                    "v-model prop/event renamed to modelValue/update:modelValue",
                ],
                &[
                    "Composition API",
                    "<script setup>",
                    "Teleport",
                    "Suspense",
                    "defineModel()",
                ],
            )
            .with_entry(
                "svelte",
                5,
                &[
                    "let no longer declares reactive state, use $state",
                    "export let replaced by $props",
                    "on:event directives replaced by event attributes",
                ],
                &["$state", "$derived", "$effect", "$props", "snippets"],
            )
    }

    /// Add (or replace) the change set for `framework` at `major`.
    pub fn with_entry(
        mut self,
        framework: &str,
        major: u64,
        breaking: &[&str],
        new_apis: &[&str],
    ) -> Self {
        self.entries.insert(
            (framework.to_string(), major),
            ChangeSet {
                breaking: breaking.iter().map(|s| s.to_string()).collect(),
                new_apis: new_apis.iter().map(|s| s.to_string()).collect(),
            },
        );
        self
    }

    fn lookup(&self, framework: &str, major: u64) -> Option<&ChangeSet> {
        let found = self.entries.get(&(framework.to_string(), major));
        if found.is_none() {
            debug!(framework, major, "No change set for framework version");
        }
        found
    }
}

impl ChangeCatalog for StaticChangeCatalog {
    fn breaking_changes(&self, framework: &str, major: u64) -> Vec<String> {
        self.lookup(framework, major)
            .map(|c| c.breaking.clone())
            .unwrap_or_default()
    }

    fn new_apis(&self, framework: &str, major: u64) -> Vec<String> {
        self.lookup(framework, major)
            .map(|c| c.new_apis.clone())
            .unwrap_or_default()
    }
}

/// Leading integer of a semantic version string, tolerating a `v` prefix.
///
/// `"16.0.0"` and `"v16"` give 16; `"latest"` gives `None`.
pub fn major_version(version: &str) -> Option<u64> {
    let trimmed = version.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
