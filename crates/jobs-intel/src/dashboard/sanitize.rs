//! Text helpers for turning untrusted feed text into display-safe markup.

use scraper::Html;

/// Escapes `&`, `<`, `>` and `"`.
///
/// Single quotes and forward slashes pass through untouched, so the output is
/// only safe inside element bodies and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Reverses HTML character references (`&amp;`, `&#39;`, `&rarr;`, ...) with
/// the full HTML5 reference table.
///
/// Text is read the way a browser reads the body of a `<textarea>`: references
/// are decoded and nothing else is interpreted. Markup is never evaluated,
/// and anything that is not a valid reference is left as written.
pub fn decode_html_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    // A reference never spans `<`, and splitting there keeps a literal
    // `</textarea` from closing the wrapper early.
    text.split('<')
        .map(decode_rcdata)
        .collect::<Vec<_>>()
        .join("<")
}

fn decode_rcdata(segment: &str) -> String {
    if !segment.contains('&') {
        return segment.to_string();
    }
    // The parser drops one newline right after `<textarea>`; the extra one
    // keeps a leading newline in `segment`.
    let fragment = Html::parse_fragment(&format!("<textarea>\n{segment}</textarea>"));
    fragment.root_element().text().collect()
}

/// Normalises text that may already carry entities into consistently escaped
/// display text: `escape_html(decode_html_entities(text))`.
pub fn clean_text(text: &str) -> String {
    escape_html(&decode_html_entities(text))
}

/// Removes `<...>` tags. A `<` without a closing `>`, or an empty `<>`, is kept
/// as literal text.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) if close > 0 => rest = &after[close + 1..],
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_neutralises_markup() {
        let escaped = escape_html("<img src=x>");
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert_eq!(escaped, "&lt;img src=x&gt;");
        assert_eq!(escape_html("Tom & \"Jerry\""), "Tom &amp; &quot;Jerry&quot;");
    }

    #[test]
    fn escape_html_leaves_single_quotes_and_slashes() {
        assert_eq!(escape_html("it's a/b"), "it's a/b");
    }

    #[test]
    fn decode_handles_named_and_numeric_references() {
        assert_eq!(decode_html_entities("AT&amp;T"), "AT&T");
        assert_eq!(decode_html_entities("it&#39;s"), "it's");
        assert_eq!(decode_html_entities("a&#x2F;b"), "a/b");
        assert_eq!(decode_html_entities("&lt;b&gt;"), "<b>");
        assert_eq!(decode_html_entities("caf&eacute;"), "caf\u{e9}");
    }

    #[test]
    fn decode_covers_the_full_reference_table() {
        assert_eq!(
            decode_html_entities("Caf&Eacute; &rarr; &laquo;Q&raquo; Espa&ntilde;a"),
            "Caf\u{c9} \u{2192} \u{ab}Q\u{bb} Espa\u{f1}a"
        );
        assert_eq!(clean_text("Next &rarr; step"), "Next \u{2192} step");
    }

    #[test]
    fn decode_leaves_markup_and_whitespace_alone() {
        assert_eq!(
            decode_html_entities("<b>x</textarea>&amp;</b>"),
            "<b>x</textarea>&</b>"
        );
        assert_eq!(decode_html_entities("\nfirst &amp; second"), "\nfirst & second");
        assert_eq!(decode_html_entities("no references"), "no references");
    }

    #[test]
    fn decode_keeps_unknown_or_unterminated_references() {
        assert_eq!(decode_html_entities("R&D team"), "R&D team");
        assert_eq!(decode_html_entities("&bogus;"), "&bogus;");
        assert_eq!(decode_html_entities("5 & 6"), "5 & 6");
        assert_eq!(decode_html_entities("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn clean_text_normalises_pre_encoded_input() {
        assert_eq!(clean_text("Q&amp;A &lt;live&gt;"), "Q&amp;A &lt;live&gt;");
        assert_eq!(clean_text("Q&A"), "Q&amp;A");
        assert_eq!(clean_text("&lt;script&gt;"), "&lt;script&gt;");
    }

    #[test]
    fn strip_tags_drops_only_complete_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("1 < 2"), "1 < 2");
        assert_eq!(strip_tags("a <> b"), "a <> b");
    }
}
