//! Markup Scanner: find embedded LaTeX regions and rewrite them.
//!
//! Three delimiter syntaxes are recognised, all case-insensitive and spanning
//! newlines:
//!
//! | kind       | delimiters            | wrapped body                             |
//! |------------|-----------------------|------------------------------------------|
//! | standard   | `[latex]…[/latex]`    | body unchanged                           |
//! | expression | `[$]…[/$]`            | `$body$`                                 |
//! | math       | `[$$]…[/$$]`          | `\begin{displaymath}body\end{displaymath}` |
//!
//! Matches of all three patterns are collected over the *original* text and
//! applied as a single batch of non-overlapping span edits, left to right.
//! When spans compete (an `[$]` region nested inside a `[latex]` region),
//! standard wins over expression wins over math. Replacement text is never
//! re-scanned, so an image filename or error fragment that happens to contain
//! a delimiter sequence stays inert.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static RE_STANDARD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\[latex\](.+?)\[/latex\]").unwrap());
static RE_EXPRESSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)\[\$\](.+?)\[/\$\]").unwrap());
static RE_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)\[\$\$\](.+?)\[/\$\$\]").unwrap());

/// Which delimiter syntax produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterKind {
    /// `[latex]…[/latex]` — body passed to the typesetter as-is.
    Standard,
    /// `[$]…[/$]` — inline math mode.
    Expression,
    /// `[$$]…[/$$]` — display math mode.
    Math,
}

impl DelimiterKind {
    fn regex(self) -> &'static Regex {
        match self {
            DelimiterKind::Standard => &RE_STANDARD,
            DelimiterKind::Expression => &RE_EXPRESSION,
            DelimiterKind::Math => &RE_MATH,
        }
    }

    fn wrap(self, body: &str) -> String {
        match self {
            DelimiterKind::Standard => body.to_string(),
            DelimiterKind::Expression => format!("${body}$"),
            DelimiterKind::Math => {
                format!("\\begin{{displaymath}}{body}\\end{{displaymath}}")
            }
        }
    }
}

/// Priority order for overlapping spans.
const KINDS: [DelimiterKind; 3] = [
    DelimiterKind::Standard,
    DelimiterKind::Expression,
    DelimiterKind::Math,
];

/// One matched region: the span of the whole match (delimiters included) and
/// the wrapped LaTeX body to hand to the render cache.
#[derive(Debug)]
pub(crate) struct RenderRequest {
    pub span: Range<usize>,
    pub wrapped: String,
}

/// Collect all non-overlapping matches, sorted by start offset.
pub(crate) fn collect_requests(text: &str) -> Vec<RenderRequest> {
    let mut requests: Vec<RenderRequest> = Vec::new();
    for kind in KINDS {
        for caps in kind.regex().captures_iter(text) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let span = whole.range();
            let overlaps = requests
                .iter()
                .any(|r| r.span.start < span.end && span.start < r.span.end);
            if overlaps {
                continue;
            }
            requests.push(RenderRequest {
                span,
                wrapped: kind.wrap(&caps[1]),
            });
        }
    }
    requests.sort_by_key(|r| r.span.start);
    requests
}

/// Apply `(span, replacement)` edits in one left-to-right pass.
///
/// Spans must be sorted and non-overlapping, which [`collect_requests`]
/// guarantees.
fn apply_edits(text: &str, edits: Vec<(Range<usize>, String)>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (span, replacement) in edits {
        out.push_str(&text[cursor..span.start]);
        out.push_str(&replacement);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Replace every delimited region in `text` with the string produced by
/// `resolve` for its wrapped body.
///
/// Text without delimiters is returned unchanged. `resolve` is called once
/// per match, in document order.
pub(crate) fn render_with(text: &str, mut resolve: impl FnMut(&str) -> String) -> String {
    let requests = collect_requests(text);
    if requests.is_empty() {
        return text.to_string();
    }
    let edits = requests
        .into_iter()
        .map(|req| {
            let replacement = resolve(&req.wrapped);
            (req.span, replacement)
        })
        .collect();
    apply_edits(text, edits)
}

/// Remove every delimited region (delimiters and body) from `text`.
///
/// Used for plain-text extraction: sort fields, search indexing and the CLI's
/// `--strip` mode all want card text with the formulas excised, not rendered.
pub fn strip_markup(text: &str) -> String {
    let requests = collect_requests(text);
    if requests.is_empty() {
        return text.to_string();
    }
    let edits = requests
        .into_iter()
        .map(|req| (req.span, String::new()))
        .collect();
    apply_edits(text, edits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo_render(text: &str) -> String {
        render_with(text, |wrapped| format!("<{wrapped}>"))
    }

    #[test]
    fn text_without_delimiters_unchanged() {
        let text = "plain text, $x$ and [brackets] but no markup";
        assert_eq!(echo_render(text), text);
        assert_eq!(strip_markup(text), text);
    }

    #[test]
    fn standard_body_passes_through() {
        assert_eq!(echo_render("a[latex]E=mc^2[/latex]b"), "a<E=mc^2>b");
    }

    #[test]
    fn expression_wraps_in_inline_math() {
        assert_eq!(echo_render("[$]x^2[/$]"), "<$x^2$>");
    }

    #[test]
    fn math_wraps_in_displaymath() {
        assert_eq!(
            echo_render("[$$]\\sum_i i[/$$]"),
            "<\\begin{displaymath}\\sum_i i\\end{displaymath}>"
        );
    }

    #[test]
    fn delimiters_are_case_insensitive() {
        assert_eq!(echo_render("[LaTeX]x[/LATEX]"), "<x>");
    }

    #[test]
    fn body_may_span_lines() {
        assert_eq!(echo_render("[latex]a\nb[/latex]"), "<a\nb>");
    }

    #[test]
    fn multiple_regions_resolved_in_document_order() {
        let out = echo_render("[$]a[/$] mid [latex]b[/latex]");
        assert_eq!(out, "<$a$> mid <b>");
    }

    #[test]
    fn nested_expression_inside_standard_is_not_rescanned() {
        // The standard match swallows the whole region; the inner [$]…[/$]
        // must not produce a second edit.
        let out = echo_render("[latex]a [$]b[/$] c[/latex]");
        assert_eq!(out, "<a [$]b[/$] c>");
    }

    #[test]
    fn replacement_text_is_inert() {
        // A resolver that emits delimiter-shaped output must not trigger
        // another round of scanning.
        let out = render_with("[$]x[/$]", |_| "[latex]boom[/latex]".to_string());
        assert_eq!(out, "[latex]boom[/latex]");
    }

    #[test]
    fn math_is_not_mistaken_for_expression() {
        // "[$$]" must not match the "[$]" pattern.
        assert_eq!(echo_render("[$$]x[/$$]"), "<\\begin{displaymath}x\\end{displaymath}>");
    }

    #[test]
    fn strip_removes_all_three_forms() {
        assert_eq!(strip_markup("a[latex]foo[/latex]b[$]y[/$]c"), "abc");
        assert_eq!(strip_markup("x[$$]m[/$$]y"), "xy");
    }

    #[test]
    fn lazy_matching_keeps_regions_minimal() {
        assert_eq!(
            echo_render("[latex]a[/latex] and [latex]b[/latex]"),
            "<a> and <b>"
        );
    }

    #[test]
    fn unterminated_region_left_alone() {
        let text = "[latex]never closed";
        assert_eq!(echo_render(text), text);
        assert_eq!(strip_markup(text), text);
    }
}
