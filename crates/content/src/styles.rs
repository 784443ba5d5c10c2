//! Stylesheet harvesting from a fetched page.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::sanitize::{is_safe_inline_style, sanitize};

/// Elements whose `style` attribute may be converted into a rule.
pub const INLINE_STYLE_SELECTOR: &str =
    "article [style], main [style], .content [style], #content [style]";

/// Typography appended to every harvested stylesheet.
pub const BASELINE_STYLES: &str = r#"
/* Baseline styles for imported content */
h1, h2, h3, h4, h5, h6 {
    margin: 1em 0 0.5em 0;
    line-height: 1.2;
}
p {
    margin: 0.5em 0;
    line-height: 1.6;
}
ul, ol {
    margin: 0.5em 0;
    padding-left: 2em;
}
li {
    margin: 0.25em 0;
}
blockquote {
    margin: 1em 0;
    padding: 0.5em 1em;
    border-left: 3px solid #ccc;
    background: #f9f9f9;
    font-style: italic;
}
code {
    background: #f5f5f5;
    padding: 0.2em 0.4em;
    border-radius: 3px;
    font-family: 'Courier New', monospace;
}
pre {
    background: #f5f5f5;
    padding: 1em;
    border-radius: 5px;
    overflow-x: auto;
}
pre code {
    background: none;
    padding: 0;
}
img {
    max-width: 100%;
    height: auto;
}
a {
    color: #2563eb;
    text-decoration: none;
}
a:hover {
    text-decoration: underline;
}
strong, b {
    font-weight: 600;
}
em, i {
    font-style: italic;
}
"#;

static STYLE_BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("style").expect("valid selector"));
static INLINE_STYLED: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(INLINE_STYLE_SELECTOR).expect("valid selector"));

/// Turn safe inline `style` attributes under the main content containers into
/// `tag.firstClass { ... }` rules, deduplicated in first-seen order.
pub fn inline_style_rules(document: &Html) -> Vec<String> {
    let mut rules: Vec<String> = Vec::new();
    for el in document.select(&INLINE_STYLED) {
        let Some(style) = el.value().attr("style") else {
            continue;
        };
        if style.is_empty() || !is_safe_inline_style(style) {
            continue;
        }
        let tag = el.value().name();
        let first_class = el
            .value()
            .attr("class")
            .and_then(|c| c.split(' ').next())
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let selector = match first_class {
            Some(class) => format!("{tag}.{class}"),
            None => tag.to_string(),
        };
        let rule = format!("{selector} {{ {style} }}");
        if !rules.contains(&rule) {
            rules.push(rule);
        }
    }
    rules
}

/// Collect a page's stylesheet.
///
/// `<style>` blocks come first, then converted inline styles under a marker
/// comment. The combination is sanitized before [`BASELINE_STYLES`] is
/// appended, and the result is trimmed.
pub fn harvest_styles(document: &Html) -> String {
    let mut css = String::new();

    let mut blocks = 0usize;
    for block in document.select(&STYLE_BLOCKS) {
        let text: String = block.text().collect();
        if !text.is_empty() {
            css.push_str(&text);
            css.push('\n');
            blocks += 1;
        }
    }

    let rules = inline_style_rules(document);
    if !rules.is_empty() {
        css.push_str("\n/* Converted inline styles */\n");
        css.push_str(&rules.join("\n"));
        css.push('\n');
    }

    tracing::debug!(style_blocks = blocks, inline_rules = rules.len(), "Harvested page styles");

    let mut css = sanitize(&css);
    css.push_str(BASELINE_STYLES);
    css.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn style_blocks_then_baseline() {
        let css = harvest_styles(&doc(
            "<head><style>.a { color: red; }</style></head><body><p>x</p></body>",
        ));
        assert!(css.starts_with(".a { color: red; }"));
        assert!(css.contains("/* Baseline styles for imported content */"));
        assert!(css.ends_with("font-style: italic;\n}"));
    }

    #[test]
    fn page_without_styles_gets_only_baseline() {
        assert_eq!(harvest_styles(&doc("<p>plain</p>")), BASELINE_STYLES.trim());
    }

    #[test]
    fn dangerous_style_block_lines_are_neutralized() {
        let css = harvest_styles(&doc(
            "<style>\n.nav {\n  position: fixed;\n  color: blue;\n}\n</style>",
        ));
        assert!(css.contains("/* Removed potentially unsafe CSS: position: fixed;... */"));
        assert!(css.contains("  color: blue;"));
    }

    #[test]
    fn inline_styles_under_content_are_converted() {
        let rules = inline_style_rules(&doc(
            r#"<article>
                <p class="lead intro" style="color: green">a</p>
                <p class="lead" style="color: green">b</p>
                <span style="font-weight: bold">c</span>
            </article>"#,
        ));
        assert_eq!(
            rules,
            vec!["p.lead { color: green }", "span { font-weight: bold }"]
        );
    }

    #[test]
    fn inline_styles_outside_content_or_unsafe_are_skipped() {
        let rules = inline_style_rules(&doc(
            r#"<div><p style="color: red">outside</p></div>
               <main style="color: blue">
                 <p style="background: url(x.png)">unsafe</p>
                 <p style="transform: rotate(1deg)">unsafe</p>
               </main>"#,
        ));
        assert!(rules.is_empty());
    }

    #[test]
    fn converted_rules_appear_under_marker() {
        let css = harvest_styles(&doc(
            r#"<div id="content"><em style="color: purple">x</em></div>"#,
        ));
        assert!(css.starts_with("/* Converted inline styles */\nem { color: purple }"));
    }
}
