//! Token-membership diff between two versions of page content.
//!
//! Both sides are split into tokens at HTML tags and newlines. Every token of
//! the proposed side is `added` or `unchanged` depending on whether it occurs
//! anywhere in the original; original tokens that never occur in the proposal
//! follow as `removed`. Order within each group follows the source text.
//!
//! This is a membership test, not a sequence alignment: moved tokens read as
//! unchanged, and a token repeated a different number of times is classified
//! by presence alone (every occurrence is emitted with the same status).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::html::escape_html;

/// Token boundaries: a whole tag, or a newline.
static TOKEN_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>|\n").expect("valid regex"));

/// The status of a token in a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    Added,
    Removed,
    Unchanged,
}

impl DiffStatus {
    /// String form, also used as the CSS class of a rendered row.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub status: DiffStatus,
    pub content: String,
}

/// Whether `proposed` differs from `original` at all.
///
/// Strict string inequality: whitespace and formatting changes count.
pub fn has_changes(original: &str, proposed: &str) -> bool {
    original != proposed
}

/// Split content into trimmed, non-empty tokens; tags become their own tokens.
pub fn tokenize(content: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in TOKEN_BOUNDARY_RE.find_iter(content) {
        tokens.push(&content[last..m.start()]);
        tokens.push(m.as_str());
        last = m.end();
    }
    tokens.push(&content[last..]);

    tokens
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Classify tokens of `proposed` against `original`, then append removals.
pub fn compute_diff(original: &str, proposed: &str) -> Vec<DiffLine> {
    let original_tokens = tokenize(original);
    let proposed_tokens = tokenize(proposed);
    let original_set: HashSet<&str> = original_tokens.iter().copied().collect();
    let proposed_set: HashSet<&str> = proposed_tokens.iter().copied().collect();

    let mut rows: Vec<DiffLine> = proposed_tokens
        .iter()
        .map(|token| DiffLine {
            status: if original_set.contains(token) {
                DiffStatus::Unchanged
            } else {
                DiffStatus::Added
            },
            content: (*token).to_string(),
        })
        .collect();

    rows.extend(
        original_tokens
            .iter()
            .filter(|token| !proposed_set.contains(*token))
            .map(|token| DiffLine {
                status: DiffStatus::Removed,
                content: (*token).to_string(),
            }),
    );

    rows
}

/// Render diff rows as HTML. Token text is escaped, so tags show literally.
pub fn render_diff_html(rows: &[DiffLine]) -> String {
    let mut html = String::from(r#"<div class="diff-content">"#);
    for row in rows {
        html.push_str(&format!(
            r#"<div class="{}">{}</div>"#,
            row.status,
            escape_html(&row.content)
        ));
    }
    html.push_str("</div>");
    html
}

/// Diff two content strings straight to HTML.
pub fn diff_html(original: &str, proposed: &str) -> String {
    render_diff_html(&compute_diff(original, proposed))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
