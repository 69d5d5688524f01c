//! Splices a docs index into the managed section of a manifest file
//! (e.g. `AGENTS.md`), leaving everything outside the section untouched.

use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const SECTION_START: &str = "<!-- AGENT-DOCS-START -->";
pub const SECTION_END: &str = "<!-- AGENT-DOCS-END -->";

#[derive(Debug)]
pub enum InjectError {
    Io(std::io::Error),
    /// The index itself contains a sentinel line.
    SentinelInIndex,
    /// The manifest has a start sentinel without an end (or the reverse, or
    /// the end comes first).
    UnbalancedSentinels,
}

impl fmt::Display for InjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectError::Io(e) => write!(f, "io error: {e}"),
            InjectError::SentinelInIndex => write!(f, "index contains a managed-section sentinel"),
            InjectError::UnbalancedSentinels => {
                write!(f, "manifest has an unterminated managed section")
            }
        }
    }
}

impl std::error::Error for InjectError {}

impl From<std::io::Error> for InjectError {
    fn from(e: std::io::Error) -> Self {
        InjectError::Io(e)
    }
}

/// True if `text` contains either sentinel.
pub fn contains_sentinel(text: &str) -> bool {
    text.contains(SECTION_START) || text.contains(SECTION_END)
}

/// Replace the managed section of `manifest` with `index`, or append a new
/// section if there is none.
pub fn inject_index(manifest: &str, index: &str) -> Result<String, InjectError> {
    if contains_sentinel(index) {
        return Err(InjectError::SentinelInIndex);
    }
    let section = format!("{SECTION_START}\n{index}\n{SECTION_END}");

    match (manifest.find(SECTION_START), manifest.find(SECTION_END)) {
        (Some(start), Some(end)) if start < end => {
            let after = end + SECTION_END.len();
            debug!(start, end = after, "Replacing existing managed section");
            Ok(format!("{}{}{}", &manifest[..start], section, &manifest[after..]))
        }
        (None, None) => {
            debug!("Appending new managed section");
            if manifest.is_empty() {
                Ok(format!("{section}\n"))
            } else if manifest.ends_with('\n') {
                Ok(format!("{manifest}\n{section}\n"))
            } else {
                Ok(format!("{manifest}\n\n{section}\n"))
            }
        }
        _ => Err(InjectError::UnbalancedSentinels),
    }
}

/// Read `path` (missing counts as empty), inject `index`, and write it back.
pub fn inject_into_file(path: &Path, index: &str) -> Result<(), InjectError> {
    let manifest = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(InjectError::Io(e)),
    };
    let updated = inject_index(&manifest, index)?;
    fs::write(path, &updated)?;
    info!(path = %path.display(), bytes = index.len(), "Injected docs index into manifest");
    Ok(())
}
