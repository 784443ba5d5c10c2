//! Comment anchoring against rendered page HTML.
//!
//! A comment may point at one element of its page through a CSS selector of
//! the form `tag:nth-of-type(n)`. Page content is user-editable, so stored
//! selectors can go stale or be malformed; those are reported and skipped.

use std::sync::LazyLock;

use docportal_core::comment::Comment;
use docportal_core::types::DbId;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

/// Elements a comment may be attached to.
pub const COMMENTABLE_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p, blockquote";

/// Characters of element text shown in a target label.
pub const TARGET_LABEL_CHARS: usize = 50;

/// Characters of element text shown in an element description.
pub const DESCRIPTION_CHARS: usize = 30;

static COMMENTABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(COMMENTABLE_SELECTOR).expect("valid selector"));

/// An element that can be picked when adding a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentTarget {
    pub selector: String,
    pub label: String,
}

/// An active comment resolved to the elements it highlights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentAnchor {
    pub comment_id: DbId,
    pub selector: String,
    pub matches: usize,
    pub description: String,
}

fn trimmed_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// `TAG - text`, cut to `max` characters with `...` once the cut is reached.
fn label(el: ElementRef<'_>, text: &str, max: usize) -> String {
    let head: String = text.chars().take(max).collect();
    let ellipsis = if head.chars().count() >= max { "..." } else { "" };
    format!("{} - {head}{ellipsis}", el.value().name().to_uppercase())
}

/// 1-based position of `el` among its element siblings with the same tag.
fn nth_of_type(el: ElementRef<'_>) -> usize {
    let name = el.value().name();
    el.prev_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|s| s.value().name() == name)
        .count()
        + 1
}

/// Every commentable element with non-empty text, in document order.
pub fn comment_targets(page_html: &str) -> Vec<CommentTarget> {
    let fragment = Html::parse_fragment(page_html);
    fragment
        .select(&COMMENTABLE)
        .filter_map(|el| {
            let text = trimmed_text(el);
            if text.is_empty() {
                return None;
            }
            Some(CommentTarget {
                selector: format!("{}:nth-of-type({})", el.value().name(), nth_of_type(el)),
                label: label(el, &text, TARGET_LABEL_CHARS),
            })
        })
        .collect()
}

fn describe_in(fragment: &Html, selector: &str) -> String {
    Selector::parse(selector)
        .ok()
        .and_then(|sel| fragment.select(&sel).next())
        .map(|el| label(el, &trimmed_text(el), DESCRIPTION_CHARS))
        .unwrap_or_else(|| selector.to_string())
}

/// Human-readable name for the first element matching `selector`, or the
/// selector itself when it is invalid or matches nothing.
pub fn describe_element(page_html: &str, selector: &str) -> String {
    describe_in(&Html::parse_fragment(page_html), selector)
}

/// Resolve the selectors of active comments against a page.
///
/// Resolved comments and comments without a selector are ignored. A selector
/// that does not parse or matches no element is logged and skipped.
pub fn resolve_anchors(page_html: &str, comments: &[&Comment]) -> Vec<CommentAnchor> {
    let fragment = Html::parse_fragment(page_html);
    let mut anchors = Vec::new();

    for comment in comments.iter().filter(|c| c.is_active()) {
        let Some(raw) = comment.element_selector.as_deref() else {
            continue;
        };
        let selector = match Selector::parse(raw) {
            Ok(sel) => sel,
            Err(e) => {
                tracing::warn!(comment_id = comment.id, selector = raw, error = ?e, "Invalid comment selector");
                continue;
            }
        };
        let matches = fragment.select(&selector).count();
        if matches == 0 {
            tracing::warn!(comment_id = comment.id, selector = raw, "Comment selector matches nothing");
            continue;
        }
        anchors.push(CommentAnchor {
            comment_id: comment.id,
            selector: raw.to_string(),
            matches,
            description: describe_in(&fragment, raw),
        });
    }

    anchors
}
