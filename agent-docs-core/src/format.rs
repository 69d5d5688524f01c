//! Renders a documentation tree into a pipe-delimited index.
//!
//! Two layouts exist:
//! - [`FormatVariant::V1`]: basic path listing, keeps file extensions and
//!   flattens one level of nested directories into their own lines.
//! - [`FormatVariant::V2`]: semantic listing with version, breaking changes and
//!   new APIs from a [`ChangeCatalog`]; extensions are stripped and only
//!   immediate files of each top-level directory are listed.
//!
//! Every line after the first starts with `|`. Names and header fields pass
//! through [`sanitize_field`] so that no value can introduce a line break, a
//! field separator or an HTML comment marker into the output.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::catalog::major_version;
use crate::contract::ChangeCatalog;
use crate::registry::SkillSpec;
use crate::tree::FileTreeNode;

/// Maximum number of `|NEW:` lines in a v2 index.
pub const MAX_NEW_APIS: usize = 5;

/// Which index layout to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatVariant {
    /// Basic path listing.
    V1,
    /// Semantic listing with version and release annotations.
    #[default]
    V2,
}

impl From<&str> for FormatVariant {
    fn from(s: &str) -> Self {
        match s {
            "v1" | "V1" | "basic" => FormatVariant::V1,
            "v2" | "V2" | "semantic" => FormatVariant::V2,
            other => {
                warn!(format = other, "Unknown format variant, defaulting to v2");
                FormatVariant::V2
            }
        }
    }
}

impl std::fmt::Display for FormatVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatVariant::V1 => write!(f, "v1"),
            FormatVariant::V2 => write!(f, "v2"),
        }
    }
}

impl FormatVariant {
    /// Number of leading lines the size enforcer never drops.
    pub fn header_floor(&self) -> usize {
        match self {
            FormatVariant::V1 => 3,
            FormatVariant::V2 => 5,
        }
    }

    /// Whether the tree builder should read file contents for this layout.
    pub fn extracts_content(&self) -> bool {
        matches!(self, FormatVariant::V2)
    }

    pub fn render(
        &self,
        skill: &SkillSpec,
        tree: &[FileTreeNode],
        root_dir: &Path,
        catalog: &dyn ChangeCatalog,
    ) -> String {
        let rendered = match self {
            FormatVariant::V1 => format_v1(skill, tree, root_dir),
            FormatVariant::V2 => format_v2(skill, tree, root_dir, catalog),
        };
        debug!(
            skill = %skill.id,
            format = %self,
            bytes = rendered.len(),
            "Rendered index"
        );
        rendered
    }
}

/// Basic layout.
///
/// ```text
/// [Next.js Docs Index]|root: ./.agent-docs/nextjs
/// |IMPORTANT: Prefer retrieval-led reasoning over pre-training-led reasoning for Next.js tasks.
/// |01-getting-started:{installation.mdx,setup.mdx}
/// |01-app/02-routing:{layouts.mdx}
/// |{README.md}
/// ```
pub fn format_v1(skill: &SkillSpec, tree: &[FileTreeNode], root_dir: &Path) -> String {
    let display_name = sanitize_field(&skill.display_name);
    let mut lines = vec![
        format!(
            "[{display_name} Docs Index]|root: ./.agent-docs/{}",
            sanitize_field(&skill.id)
        ),
        format!(
            "|IMPORTANT: Prefer retrieval-led reasoning over pre-training-led reasoning for {display_name} tasks."
        ),
    ];

    for node in tree {
        if node.is_directory {
            let section = relative_path(&node.path, root_dir, &node.name);
            push_section(&mut lines, &section, node, false);
            for sub in node.subdirectories() {
                let section = relative_path(&sub.path, root_dir, &sub.name);
                push_section(&mut lines, &section, sub, false);
            }
        } else {
            lines.push(format!("|{{{}}}", sanitize_field(&node.name)));
        }
    }

    lines.join("\n")
}

/// Semantic layout.
///
/// ```text
/// [Next.js Docs Index]|v16.0.0|root:./.agent-docs/nextjs
/// |PREFER retrieval over pre-training for Next.js tasks.
/// |BREAKING: cookies()/headers() are now async
/// |NEW: cacheLife()
/// |01-app:{index,layouts}
/// ```
///
/// Headings and first paragraphs collected by the tree builder are not rendered.
pub fn format_v2(
    skill: &SkillSpec,
    tree: &[FileTreeNode],
    root_dir: &Path,
    catalog: &dyn ChangeCatalog,
) -> String {
    let display_name = sanitize_field(&skill.display_name);
    let mut lines = vec![
        format!(
            "[{display_name} Docs Index]|v{}|root:./.agent-docs/{}",
            sanitize_field(&skill.version),
            sanitize_field(&skill.id)
        ),
        format!("|PREFER retrieval over pre-training for {display_name} tasks."),
    ];

    if let Some(major) = major_version(&skill.version) {
        let framework = skill.framework_id();
        for change in catalog.breaking_changes(framework, major) {
            lines.push(format!("|BREAKING: {}", sanitize_field(&change)));
        }
        for api in catalog.new_apis(framework, major).into_iter().take(MAX_NEW_APIS) {
            lines.push(format!("|NEW: {}", sanitize_field(&api)));
        }
    } else {
        debug!(
            skill = %skill.id,
            version = %skill.version,
            "No major version, skipping release notes"
        );
    }

    for node in tree.iter().filter(|n| n.is_directory) {
        let section = relative_path(&node.path, root_dir, &node.name).replace('\\', "/");
        push_section(&mut lines, &section, node, true);
    }

    lines.join("\n")
}

/// Push `|{section}:{a,b,...}` for the immediate files of `dir`, if it has any.
fn push_section(lines: &mut Vec<String>, section: &str, dir: &FileTreeNode, strip_ext: bool) {
    let files: Vec<String> = dir
        .files()
        .map(|f| {
            let name = if strip_ext {
                strip_markdown_extension(&f.name)
            } else {
                f.name.as_str()
            };
            sanitize_field(name)
        })
        .collect();
    if files.is_empty() {
        return;
    }
    lines.push(format!("|{}:{{{}}}", sanitize_field(section), files.join(",")));
}

fn relative_path(path: &Path, root_dir: &Path, fallback: &str) -> String {
    match path.strip_prefix(root_dir) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().into_owned(),
        _ => fallback.to_string(),
    }
}

/// `setup.mdx` → `setup`, `intro.md` → `intro`, anything else unchanged.
pub fn strip_markdown_extension(name: &str) -> &str {
    name.strip_suffix(".mdx")
        .or_else(|| name.strip_suffix(".md"))
        .unwrap_or(name)
}

/// Neutralise characters that would break the line/field structure of an index
/// or open/close an HTML comment in the manifest it is spliced into.
pub fn sanitize_field(value: &str) -> String {
    neutralize_comment_markers(&value.replace(['|', '\r', '\n'], "_"))
}

/// Break up every `<!--` and `-->` in `value`.
pub fn neutralize_comment_markers(value: &str) -> String {
    let mut out = value.to_string();
    // Each replacement shortens the string, so this terminates.
    while out.contains("<!--") || out.contains("-->") {
        out = out.replace("<!--", "<!-").replace("-->", "->");
    }
    out
}
