//! Tree builder: walks a documentation cache directory into an ordered tree of
//! [`FileTreeNode`]s.
//!
//! Only markdown (`.md`) and MDX (`.mdx`) files become file nodes. Dotfiles are
//! skipped, and directories that end up without any qualifying descendant are
//! pruned. A missing or unreadable root is "no docs yet" and yields an empty tree.
//!
//! Entries are sorted by name within each directory so that repeated builds over
//! the same snapshot produce the same tree regardless of the platform's listing
//! order.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Maximum number of headings kept per file.
pub const MAX_HEADINGS: usize = 5;

/// Paragraphs longer than this are cut to `PARAGRAPH_CUT` chars plus an ellipsis.
pub const MAX_PARAGRAPH_CHARS: usize = 150;
const PARAGRAPH_CUT: usize = 147;

/// One filesystem entry under a documentation cache root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeNode {
    /// Absolute (or root-joined) location of the entry.
    pub path: PathBuf,
    /// Base name, including the extension for files.
    pub name: String,
    pub is_directory: bool,
    /// Ordered children; empty for files.
    pub children: Vec<FileTreeNode>,
    /// Up to [`MAX_HEADINGS`] `#`/`##` headings, in document order.
    pub headings: Vec<String>,
    pub first_paragraph: Option<String>,
}

impl FileTreeNode {
    /// Immediate file children of a directory node.
    pub fn files(&self) -> impl Iterator<Item = &FileTreeNode> {
        self.children.iter().filter(|c| !c.is_directory)
    }

    /// Immediate directory children of a directory node.
    pub fn subdirectories(&self) -> impl Iterator<Item = &FileTreeNode> {
        self.children.iter().filter(|c| c.is_directory)
    }
}

/// Returns true for names ending in `.md` or `.mdx`.
pub fn is_markdown(name: &str) -> bool {
    name.ends_with(".md") || name.ends_with(".mdx")
}

/// Build the documentation tree rooted at `root`.
///
/// With `extract_content` set, each markdown file is read and its headings and
/// first paragraph are recorded. A file that cannot be read is still emitted,
/// just without those fields.
pub fn build_tree(root: &Path, extract_content: bool) -> Vec<FileTreeNode> {
    let nodes = build_dir(root, extract_content);
    debug!(
        root = %root.display(),
        top_level = nodes.len(),
        extract_content,
        "Built documentation tree"
    );
    nodes
}

fn build_dir(dir: &Path, extract_content: bool) -> Vec<FileTreeNode> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) => {
            debug!(
                path = %dir.display(),
                error = ?e,
                "Docs directory missing or unreadable, treating as empty"
            );
            return Vec::new();
        }
    };

    let mut entries: Vec<(String, PathBuf, bool)> = Vec::new();
    for entry_res in read {
        match entry_res {
            Ok(entry) => {
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.starts_with('.') {
                    continue;
                }
                // file_type() does not follow symlinks, so linked dirs cannot loop.
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                entries.push((name, entry.path(), is_dir));
            }
            Err(e) => {
                warn!(path = %dir.display(), error = ?e, "Skipping unreadable directory entry");
            }
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut nodes = Vec::new();
    for (name, path, is_dir) in entries {
        if is_dir {
            let children = build_dir(&path, extract_content);
            if children.is_empty() {
                debug!(path = %path.display(), "Pruning directory without markdown files");
                continue;
            }
            nodes.push(FileTreeNode {
                path,
                name,
                is_directory: true,
                children,
                headings: Vec::new(),
                first_paragraph: None,
            });
        } else if is_markdown(&name) {
            let (headings, first_paragraph) = if extract_content {
                match fs::read_to_string(&path) {
                    Ok(content) => (
                        extract_headings(&content),
                        extract_first_paragraph(&content),
                    ),
                    Err(e) => {
                        debug!(
                            path = %path.display(),
                            error = ?e,
                            "Failed to read doc for extraction"
                        );
                        (Vec::new(), None)
                    }
                }
            } else {
                (Vec::new(), None)
            };
            nodes.push(FileTreeNode {
                path,
                name,
                is_directory: false,
                children: Vec::new(),
                headings,
                first_paragraph,
            });
        }
    }
    nodes
}

/// Collect `# ` and `## ` headings in document order, capped at [`MAX_HEADINGS`].
pub fn extract_headings(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            line.strip_prefix("# ")
                .or_else(|| line.strip_prefix("## "))
                .map(str::trim)
        })
        .filter(|heading| !heading.is_empty())
        .take(MAX_HEADINGS)
        .map(str::to_string)
        .collect()
}

/// First run of prose lines, space-joined.
///
/// Frontmatter, `---` rules, headings, fenced code and `import` lines are
/// skipped. A leading `---` only opens frontmatter when a closing `---`
/// follows. The run ends at the first blank line after some text was
/// collected, or as soon as the text grows past [`MAX_PARAGRAPH_CHARS`].
pub fn extract_first_paragraph(content: &str) -> Option<String> {
    let mut paragraph = String::new();
    let mut in_code = false;
    let frontmatter_end = frontmatter_end(content);

    for (idx, line) in content.lines().enumerate() {
        if frontmatter_end.is_some_and(|end| idx <= end) {
            continue;
        }
        let trimmed = line.trim();
        if trimmed == "---" {
            continue;
        }
        if trimmed.starts_with("```") {
            in_code = !in_code;
            continue;
        }
        if in_code || trimmed.starts_with('#') || trimmed.starts_with("import ") {
            continue;
        }

        if trimmed.is_empty() {
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }

        if !paragraph.is_empty() {
            paragraph.push(' ');
        }
        paragraph.push_str(trimmed);

        if paragraph.chars().count() > MAX_PARAGRAPH_CHARS {
            let mut cut: String = paragraph.chars().take(PARAGRAPH_CUT).collect();
            cut.push_str("...");
            return Some(cut);
        }
    }

    if paragraph.is_empty() {
        None
    } else {
        Some(paragraph)
    }
}

/// Line index of the `---` closing a frontmatter block opened on line 0.
fn frontmatter_end(content: &str) -> Option<usize> {
    let mut lines = content.lines();
    if lines.next()?.trim() != "---" {
        return None;
    }
    lines.position(|l| l.trim() == "---").map(|pos| pos + 1)
}
