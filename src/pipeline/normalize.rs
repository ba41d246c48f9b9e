//! Entity and line-break normalisation of formula bodies.
//!
//! Card text arrives HTML-flavoured: the editor stores `α` as `&alpha;` and
//! newlines as `<br>` tags. The typesetter wants literal characters, and the
//! cache key must be computed over exactly the bytes the typesetter consumes,
//! so this normalisation runs once, before hashing.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_BR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

/// Decode HTML named entities and convert `<br>`/`<br/>` tags to newlines.
///
/// Unrecognised entities are left untouched, matching how browsers display
/// them; a formula author who literally typed `&foo;` sees it typeset as-is.
pub fn normalize_latex(input: &str) -> String {
    let decoded = html_escape::decode_html_entities(input);
    RE_BR.replace_all(&decoded, "\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_entity_becomes_literal() {
        assert_eq!(normalize_latex("&alpha;"), "\u{3b1}");
        assert_eq!(normalize_latex("x &lt; y &amp; z"), "x < y & z");
    }

    #[test]
    fn br_variants_become_newlines() {
        assert_eq!(normalize_latex("a<br>b"), "a\nb");
        assert_eq!(normalize_latex("a<br/>b"), "a\nb");
        assert_eq!(normalize_latex("a<br />b"), "a\nb");
        assert_eq!(normalize_latex("a<BR>b"), "a\nb");
    }

    #[test]
    fn plain_latex_passes_through() {
        let src = "\\frac{1}{2} + x^2";
        assert_eq!(normalize_latex(src), src);
    }

    #[test]
    fn unknown_entity_left_alone() {
        assert_eq!(normalize_latex("&notanentity;"), "&notanentity;");
    }
}
