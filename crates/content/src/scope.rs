//! CSS selector scoping for imported stylesheets.
//!
//! [`scope`] walks a stylesheet once, keeping a stack of open blocks in place
//! of a bare brace-depth counter. Text in selector position (top level, or
//! inside a grouping at-rule such as `@media`) is scoped when its `{` arrives,
//! so several rules on one line and rules nested in a one-line `@media` are
//! all handled. Comments are skipped over and never open or close a block. A
//! `{` inside a string or attribute selector is treated as a rule opener;
//! such selectors come out mangled.

use chrono::{DateTime, Utc};

/// Class-name prefix of every generated scope.
pub const SCOPE_PREFIX: &str = "imported-content";

/// Longest slice of the normalized source kept in a scope id.
pub const MAX_SOURCE_TOKEN_CHARS: usize = 24;

/// Selectors that are never prefixed even though they are plain selectors.
const UNSCOPED_SELECTORS: &[&str] = &["html", "body"];

/// At-rules whose blocks hold rule sets rather than declarations.
const GROUPING_AT_RULES: &[&str] = &[
    "@media",
    "@supports",
    "@layer",
    "@container",
    "@document",
    "@-moz-document",
];

/// Build a unique scope class for an import.
///
/// The source is reduced to its ASCII alphanumerics (capped at
/// [`MAX_SOURCE_TOKEN_CHARS`]) and suffixed with the millisecond timestamp,
/// which is never truncated.
pub fn generate_scope_id(source: &str, now: DateTime<Utc>) -> String {
    let token: String = source
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_SOURCE_TOKEN_CHARS)
        .collect();
    let token = if token.is_empty() { "imported".to_string() } else { token };
    format!("{SCOPE_PREFIX}-{token}-{}", now.timestamp_millis())
}

#[derive(Debug, Clone, Copy)]
enum Block {
    /// Contents are rule sets whose selectors get scoped.
    Rules,
    /// Declarations, or anything else passed through verbatim.
    Declarations,
}

fn prefix_selector(selector: &str, scope_selector: &str) -> String {
    if selector.contains(scope_selector)
        || selector.starts_with(':')
        || selector.starts_with('@')
        || UNSCOPED_SELECTORS.contains(&selector)
    {
        selector.to_string()
    } else {
        format!("{scope_selector} {selector}")
    }
}

/// Split off leading whitespace and complete comments.
fn split_leading_trivia(prelude: &str) -> (&str, &str) {
    let mut rest = prelude;
    loop {
        let trimmed = rest.trim_start();
        let after_comment = trimmed
            .strip_prefix("/*")
            .and_then(|body| body.find("*/").map(|end| &body[end + 2..]));
        match after_comment {
            Some(after) => rest = after,
            None => {
                rest = trimmed;
                break;
            }
        }
    }
    prelude.split_at(prelude.len() - rest.len())
}

fn at_rule_holds_rules(at_rule: &str) -> bool {
    let name = at_rule
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    GROUPING_AT_RULES.contains(&name.as_str())
}

fn scope_prelude(prelude: &str, scope_selector: &str) -> String {
    let (trivia, rest) = split_leading_trivia(prelude);
    let selector = rest.trim_end();
    if selector.is_empty() {
        return prelude.to_string();
    }
    let trailing = &rest[selector.len()..];
    let scoped = selector
        .split(',')
        .map(|s| prefix_selector(s.trim(), scope_selector))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{trivia}{scoped}{trailing}")
}

/// Prefix every rule selector in `css` with `scope_selector`.
///
/// - the prelude before each top-level `{` is a selector list: each
///   comma-separated selector is prefixed unless it already contains the
///   scope, starts with `:` or `@`, or is exactly `html`/`body`; selectors are
///   rejoined with `", "`;
/// - at-rule headers pass through; `@media`-style blocks have their nested
///   rules scoped, other at-rule blocks (`@font-face`, `@keyframes`) pass
///   through whole;
/// - declarations, comments and whitespace pass through verbatim.
pub fn scope(css: &str, scope_selector: &str) -> String {
    let bytes = css.as_bytes();
    let mut out = String::with_capacity(css.len() + css.len() / 4);
    let mut blocks: Vec<Block> = Vec::new();
    let mut pending = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i = match css[i + 2..].find("*/") {
                Some(end) => i + 2 + end + 2,
                None => css.len(),
            };
            continue;
        }

        let in_rules = matches!(blocks.last(), None | Some(Block::Rules));
        match bytes[i] {
            b'{' if in_rules => {
                let prelude = &css[pending..i];
                let (_, head) = split_leading_trivia(prelude);
                if head.starts_with('@') {
                    out.push_str(prelude);
                    blocks.push(if at_rule_holds_rules(head) {
                        Block::Rules
                    } else {
                        Block::Declarations
                    });
                } else {
                    out.push_str(&scope_prelude(prelude, scope_selector));
                    blocks.push(Block::Declarations);
                }
                out.push('{');
            }
            b'{' => {
                out.push_str(&css[pending..=i]);
                blocks.push(Block::Declarations);
            }
            b'}' => {
                out.push_str(&css[pending..=i]);
                blocks.pop();
            }
            b';' if in_rules => out.push_str(&css[pending..=i]),
            _ => {
                i += 1;
                continue;
            }
        }
        i += 1;
        pending = i;
    }

    out.push_str(&css[pending..]);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
