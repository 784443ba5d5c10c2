//! Line-level CSS denylist filter.
//!
//! No CSS parser is involved. Each line is lower-cased, trimmed, and checked
//! for substrings from [`DANGEROUS_PATTERNS`]; a matching line is replaced by
//! a comment naming what was removed. Declarations that wrap across lines are
//! judged line by line, so this can both miss and over-remove content.

// ---------------------------------------------------------------------------
// Denylists
// ---------------------------------------------------------------------------

/// Substrings that remove a stylesheet line when present (lower-case).
pub const DANGEROUS_PATTERNS: &[&str] = &[
    "position: fixed",
    "position:fixed",
    "position: absolute",
    "position:absolute",
    "z-index",
    "transform:",
    "animation:",
    "transition:",
    "@import",
    "javascript:",
    "expression(",
    "behavior:",
    "binding:",
    "overflow: hidden",
    "overflow:hidden",
    "width: 100vw",
    "width:100vw",
    "height: 100vh",
    "height:100vh",
    "margin: -",
    "margin:-",
    "top: -",
    "top:-",
    "left: -",
    "left:-",
    "right: -",
    "right:-",
    "bottom: -",
    "bottom:-",
];

/// Substrings that make an inline `style` attribute ineligible for import.
pub const UNSAFE_INLINE_PATTERNS: &[&str] = &[
    "position: fixed",
    "position: absolute",
    "z-index",
    "transform",
    "animation",
    "transition",
    "@import",
    "javascript:",
    "expression(",
    "behavior:",
    "binding:",
    "url(",
    "-moz-binding",
    "-webkit-binding",
];

/// How much of a removed line is quoted in its replacement comment.
pub const REMOVED_SNIPPET_CHARS: usize = 50;

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Whether a lower-cased, trimmed line contains a denylisted pattern.
pub fn is_dangerous_line(lowered: &str) -> bool {
    DANGEROUS_PATTERNS.iter().any(|p| lowered.contains(p))
}

/// Whether an inline `style` attribute value may be converted into a rule.
pub fn is_safe_inline_style(style: &str) -> bool {
    let lowered = style.to_lowercase();
    !UNSAFE_INLINE_PATTERNS.iter().any(|p| lowered.contains(p))
}

/// A trimmed line that is only comment text: it opens a comment and the first
/// close, if any, ends the line.
fn is_comment_line(trimmed: &str) -> bool {
    if !trimmed.starts_with("/*") {
        return false;
    }
    match trimmed[2..].find("*/") {
        None => true,
        Some(pos) => pos + 2 + 2 == trimmed.len(),
    }
}

/// Whether `code`, read from outside any comment, ends inside an unclosed one.
fn ends_inside_comment(code: &str) -> bool {
    let mut rest = code;
    while let Some(open) = rest.find("/*") {
        match rest[open + 2..].find("*/") {
            Some(close) => rest = &rest[open + 2 + close + 2..],
            None => return true,
        }
    }
    false
}

fn removal_comment(trimmed: &str) -> String {
    let snippet: String = trimmed
        .replace("/*", "")
        .replace("*/", "")
        .chars()
        .take(REMOVED_SNIPPET_CHARS)
        .collect();
    format!("/* Removed potentially unsafe CSS: {}... */", snippet.trim())
}

// ---------------------------------------------------------------------------
// Sanitizer
// ---------------------------------------------------------------------------

/// Filter a stylesheet line by line.
///
/// Blank and comment-only lines pass through unchanged, as does any text
/// inside a `/* ... */` comment spanning several lines. Lines matching the
/// denylist become an explanatory comment; everything else is kept verbatim.
pub fn sanitize(css: &str) -> String {
    let mut in_comment = false;
    let mut out = Vec::new();

    for line in css.split('\n') {
        let (closed, code) = if in_comment {
            match line.find("*/") {
                Some(pos) => line.split_at(pos + 2),
                None => {
                    out.push(line.to_string());
                    continue;
                }
            }
        } else {
            ("", line)
        };
        in_comment = ends_inside_comment(code);

        let trimmed = code.trim();
        if trimmed.is_empty()
            || is_comment_line(trimmed)
            || !is_dangerous_line(&trimmed.to_lowercase())
        {
            out.push(line.to_string());
            continue;
        }

        tracing::debug!(line = %trimmed, "Removed unsafe CSS line");
        let mut replaced = if closed.is_empty() {
            removal_comment(trimmed)
        } else {
            format!("{closed} {}", removal_comment(trimmed))
        };
        if in_comment {
            replaced.push_str(" /*");
        }
        out.push(replaced);
    }

    out.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn retained_code_lines(css: &str) -> Vec<String> {
        css.split('\n')
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty() && !is_comment_line(l))
            .collect()
    }

    #[test]
    fn safe_css_is_untouched() {
        let css = ".a {\n  color: red;\n  margin: 1em 0;\n}\n";
        assert_eq!(sanitize(css), css);
    }

    #[test]
    fn dangerous_line_becomes_comment() {
        let out = sanitize(".nav {\n  position: fixed;\n  color: blue;\n}");
        assert_eq!(
            out,
            ".nav {\n/* Removed potentially unsafe CSS: position: fixed;... */\n  color: blue;\n}"
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let out = sanitize("  Z-INDEX: 9999;");
        assert!(out.starts_with("/* Removed"));
    }

    #[test]
    fn no_denylisted_pattern_survives_on_code_lines() {
        let mut css = String::new();
        for (i, pattern) in DANGEROUS_PATTERNS.iter().enumerate() {
            css.push_str(&format!(".r{i} {{ {pattern}5px; }}\n"));
            css.push_str(&format!("  {}1;\n", pattern.to_uppercase()));
        }
        let out = sanitize(&css);
        for line in retained_code_lines(&out) {
            let lowered = line.to_lowercase();
            for pattern in DANGEROUS_PATTERNS {
                assert!(!lowered.contains(pattern), "'{pattern}' survived in '{line}'");
            }
        }
    }

    #[test]
    fn removal_comment_cannot_close_early() {
        let out = sanitize("a { color: red } /* x */ b { position: fixed }");
        assert_eq!(out.matches("*/").count(), 1);
        assert!(out.ends_with("*/"));
    }

    #[test]
    fn comments_and_blank_lines_pass_through() {
        let css = "/* position: fixed is discussed here */\n\n   \n/* open comment";
        assert_eq!(sanitize(css), css);
    }

    #[test]
    fn multi_line_comment_body_is_left_alone() {
        let css = "/*\n.old { position: fixed }\n*/\n.keep { color: red }";
        assert_eq!(sanitize(css), css);
    }

    #[test]
    fn code_after_multi_line_comment_closes_is_checked() {
        let out = sanitize("/* start\nend */ .y { position: fixed }\n.z { color: red }");
        assert_eq!(
            out,
            "/* start\nend */ /* Removed potentially unsafe CSS: .y { position: fixed }... */\n.z { color: red }"
        );
    }

    #[test]
    fn removed_line_reopens_comment_it_started() {
        let out = sanitize(".a { z-index: 1 } /* note\nstill note */\n.b { color: red }");
        assert_eq!(out.matches("/*").count(), out.matches("*/").count());
        assert!(out.starts_with("/* Removed potentially unsafe CSS: .a { z-index: 1 }"));
        assert!(out.ends_with("... */ /*\nstill note */\n.b { color: red }"));
    }

    #[test]
    fn code_after_comment_is_still_checked() {
        let out = sanitize("/* note */ .x { z-index: 3 }");
        assert!(out.starts_with("/* Removed"));
    }

    #[test]
    fn long_lines_are_truncated_in_comment() {
        let line = format!(".x {{ transform: {} }}", "rotate(1deg) ".repeat(10));
        let out = sanitize(&line);
        let quoted = out
            .trim_start_matches("/* Removed potentially unsafe CSS: ")
            .trim_end_matches("... */");
        assert!(quoted.chars().count() <= REMOVED_SNIPPET_CHARS);
    }

    #[test]
    fn inline_style_safety() {
        assert!(is_safe_inline_style("color: red; font-weight: bold"));
        assert!(!is_safe_inline_style("background: URL(evil.png)"));
        assert!(!is_safe_inline_style("transition: all 1s"));
        assert!(!is_safe_inline_style("-moz-binding: x"));
    }
}
