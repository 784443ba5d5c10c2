//! HTML text escaping shared by the differ and the content extractor.

/// Escape text for safe inclusion in HTML element content.
///
/// Replaces `&`, `<`, `>`, `"` and `'` with their entity forms. `&` is
/// handled first so existing entities are escaped rather than preserved.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
