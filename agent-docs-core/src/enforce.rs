//! Size enforcer: squeezes a rendered index under a byte budget.
//!
//! Passes run in a fixed order and each one rewrites the whole string before the
//! size is measured again:
//!
//! 1. strip `.md`/`.mdx` extensions
//! 2. abbreviate verbose path segments (`getting-started` → `gs`, ...)
//! 3. contract numbered segments (`01-app` → `1a`, `02-routing` → `2r`)
//! 4. collapse runs of `|`
//! 5. drop trailing lines until the budget or the header floor is reached
//!
//! All passes are lossy. Segment contraction in particular is approximate: two
//! sections whose names share a numeric prefix and first letter map to the same
//! token, and nothing can recover the original names. The enforcer never fails;
//! when the floor is reached the output may still exceed the budget.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Budget used when none (or zero) is configured.
pub const DEFAULT_TARGET_BYTES: usize = 8192;

/// Literal, case-sensitive segment abbreviations applied by pass 2.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("getting-started", "gs"),
    ("api-reference", "api"),
    ("building-your-application", "build"),
    ("configuration", "config"),
];

static MARKDOWN_EXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.mdx?").unwrap());

// A two-digit prefix at the start of a path segment, its first letter, and the
// rest of the segment. The leading delimiter is kept.
static NUMBERED_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[/|:{,])(\d{2})-([a-z])[a-z0-9_-]*").unwrap());

static PIPE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|{2,}").unwrap());

/// What the enforcer had to do to an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnforceReport {
    /// Number of passes (1..=5) that ran; 0 if the input already fit.
    pub passes_applied: usize,
    pub lines_dropped: usize,
    pub within_budget: bool,
}

/// Shrink `index` to at most `target_bytes` UTF-8 bytes, never dropping below
/// `floor_lines` lines.
pub fn enforce_size(index: &str, target_bytes: usize, floor_lines: usize) -> String {
    enforce_size_with_report(index, target_bytes, floor_lines).0
}

/// Like [`enforce_size`], also reporting which passes were needed.
pub fn enforce_size_with_report(
    index: &str,
    target_bytes: usize,
    floor_lines: usize,
) -> (String, EnforceReport) {
    let target = if target_bytes == 0 { DEFAULT_TARGET_BYTES } else { target_bytes };
    let mut report = EnforceReport::default();
    let mut current = index.to_string();

    if current.len() <= target {
        report.within_budget = true;
        return (current, report);
    }

    let passes: [(&str, fn(&str) -> String); 4] = [
        ("strip_extensions", strip_extensions),
        ("abbreviate_segments", abbreviate_segments),
        ("contract_numbered_segments", contract_numbered_segments),
        ("collapse_pipes", collapse_pipes),
    ];
    for (name, pass) in passes {
        let before = current.len();
        current = pass(&current);
        report.passes_applied += 1;
        debug!(pass = name, before, after = current.len(), target, "Applied size pass");
        if current.len() <= target {
            report.within_budget = true;
            return (current, report);
        }
    }

    report.passes_applied += 1;
    let mut lines: Vec<&str> = current.split('\n').collect();
    let mut size = current.len();
    while size > target && lines.len() > floor_lines {
        if let Some(last) = lines.pop() {
            // The dropped line plus the newline that joined it.
            size -= last.len() + usize::from(!lines.is_empty());
            report.lines_dropped += 1;
        }
    }
    let truncated = lines.join("\n");
    report.within_budget = truncated.len() <= target;

    if report.within_budget {
        debug!(
            lines_dropped = report.lines_dropped,
            bytes = truncated.len(),
            target,
            "Truncated index to budget"
        );
    } else {
        warn!(
            bytes = truncated.len(),
            target,
            floor = floor_lines,
            "Index still over budget at header floor"
        );
    }
    (truncated, report)
}

/// Pass 1.
pub fn strip_extensions(index: &str) -> String {
    MARKDOWN_EXT.replace_all(index, "").into_owned()
}

/// Pass 2.
pub fn abbreviate_segments(index: &str) -> String {
    ABBREVIATIONS
        .iter()
        .fold(index.to_string(), |acc, (long, short)| acc.replace(long, short))
}

/// Pass 3: `01-getting-started` → `1g`.
pub fn contract_numbered_segments(index: &str) -> String {
    NUMBERED_SEGMENT
        .replace_all(index, |caps: &regex::Captures| {
            let number: u32 = caps[2].parse().unwrap_or(0);
            format!("{}{}{}", &caps[1], number, &caps[3])
        })
        .into_owned()
}

/// Pass 4.
pub fn collapse_pipes(index: &str) -> String {
    PIPE_RUN.replace_all(index, "|").into_owned()
}
