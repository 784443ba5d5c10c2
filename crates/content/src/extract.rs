//! Main-content extraction from a parsed web page.
//!
//! Boilerplate subtrees are pruned, a content root is located, and the root's
//! headings, paragraphs, lists, quotes, and code blocks are re-emitted as
//! bare tags around escaped text. No attributes are ever emitted.

use std::collections::HashSet;
use std::sync::LazyLock;

use docportal_core::html::escape_html;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Returned when nothing usable was found.
pub const NO_CONTENT_PLACEHOLDER: &str =
    "<p>No content could be extracted from this webpage.</p>";

/// Elements (with their subtrees) ignored during extraction.
pub const BOILERPLATE_SELECTOR: &str =
    "script, style, nav, header, footer, aside, .navigation, .sidebar, .ads, .advertisement";

/// Content-root candidates, tried in this order.
pub const CONTENT_ROOT_SELECTORS: &[&str] =
    &["main", "article", ".content", ".post", ".entry", "#content", "#main"];

/// Block elements collected from the content root, in document order.
pub const BLOCK_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p, ul, ol, blockquote, pre, code";

/// Blocks must have fewer trimmed characters than this to be kept.
pub const MAX_BLOCK_CHARS: usize = 1000;

/// List items must have fewer trimmed characters than this to be kept.
pub const MAX_LIST_ITEM_CHARS: usize = 300;

/// Fallback lines must have fewer trimmed characters than this to be kept.
pub const MAX_FALLBACK_LINE_CHARS: usize = 500;

static BOILERPLATE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(BOILERPLATE_SELECTOR).expect("valid selector"));
static CONTENT_ROOTS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    CONTENT_ROOT_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("valid selector"))
        .collect()
});
static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid selector"));
static BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(BLOCK_SELECTOR).expect("valid selector"));
static LIST_ITEMS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("valid selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

/// Boilerplate elements found in a document. `scraper` trees are immutable,
/// so pruning is a lookup consulted while walking rather than a removal.
struct Pruned {
    removed: HashSet<NodeId>,
}

impl Pruned {
    fn new(document: &Html) -> Self {
        Self {
            removed: document.select(&BOILERPLATE).map(|el| el.id()).collect(),
        }
    }

    fn is_removed(&self, el: ElementRef<'_>) -> bool {
        self.removed.contains(&el.id())
    }

    /// The element or one of its ancestors is boilerplate.
    fn is_within_removed(&self, el: ElementRef<'_>) -> bool {
        self.is_removed(el) || el.ancestors().any(|node| self.removed.contains(&node.id()))
    }

    /// Text content of `el`, skipping boilerplate descendants.
    fn text(&self, el: ElementRef<'_>) -> String {
        let mut out = String::new();
        self.collect_text(el, &mut out);
        out
    }

    fn collect_text(&self, el: ElementRef<'_>, out: &mut String) {
        for child in el.children() {
            if let Some(child_el) = ElementRef::wrap(child) {
                if !self.is_removed(child_el) {
                    self.collect_text(child_el, out);
                }
            } else if let Some(text) = child.value().as_text() {
                out.push_str(text);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// The document's `<title>` text, trimmed, when non-empty.
pub fn document_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn content_root<'a>(document: &'a Html, pruned: &Pruned) -> ElementRef<'a> {
    CONTENT_ROOTS
        .iter()
        .find_map(|sel| document.select(sel).find(|el| !pruned.is_within_removed(*el)))
        .or_else(|| document.select(&BODY).next())
        .unwrap_or_else(|| document.root_element())
}

fn emit_list(el: ElementRef<'_>, tag: &str, pruned: &Pruned, html: &mut String) {
    let items: Vec<_> = el
        .select(&LIST_ITEMS)
        .filter(|li| !pruned.is_within_removed(*li))
        .collect();
    if items.is_empty() {
        return;
    }
    html.push_str(&format!("<{tag}>\n"));
    for li in items {
        let text = pruned.text(li);
        let text = text.trim();
        if !text.is_empty() && text.chars().count() < MAX_LIST_ITEM_CHARS {
            html.push_str(&format!("<li>{}</li>\n", escape_html(text)));
        }
    }
    html.push_str(&format!("</{tag}>\n"));
}

fn fallback_paragraphs(root: ElementRef<'_>, pruned: &Pruned) -> String {
    pruned
        .text(root)
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.chars().count() < MAX_FALLBACK_LINE_CHARS)
        .map(|line| format!("<p>{}</p>", escape_html(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reduce a parsed page to whitelisted block elements with escaped text.
///
/// When the content root contains none of [`BLOCK_SELECTOR`], every short
/// non-empty line of its text becomes a paragraph instead. Returns
/// [`NO_CONTENT_PLACEHOLDER`] when both yield nothing.
pub fn extract(document: &Html) -> String {
    let pruned = Pruned::new(document);
    let root = content_root(document, &pruned);

    let blocks: Vec<ElementRef<'_>> = root
        .select(&BLOCKS)
        .filter(|el| !pruned.is_within_removed(*el))
        .collect();

    let html = if blocks.is_empty() {
        fallback_paragraphs(root, &pruned)
    } else {
        let mut html = String::new();
        for el in blocks {
            let text = pruned.text(el);
            let text = text.trim();
            let len = text.chars().count();
            if len == 0 || len >= MAX_BLOCK_CHARS {
                continue;
            }
            match el.value().name() {
                tag @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" | "blockquote") => {
                    html.push_str(&format!("<{tag}>{}</{tag}>\n", escape_html(text)));
                }
                tag @ ("ul" | "ol") => emit_list(el, tag, &pruned, &mut html),
                "pre" | "code" => {
                    html.push_str(&format!("<pre><code>{}</code></pre>\n", escape_html(text)));
                }
                _ => {}
            }
        }
        html
    };

    tracing::debug!(
        extracted_bytes = html.len(),
        root = root.value().name(),
        "Extracted main content",
    );

    if html.is_empty() {
        NO_CONTENT_PLACEHOLDER.to_string()
    } else {
        html
    }
}

/// Parse `html` as a full document and [`extract`] it.
pub fn extract_html(html: &str) -> String {
    extract(&Html::parse_document(html))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
