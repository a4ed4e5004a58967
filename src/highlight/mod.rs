//! Syntax highlighting for declaration snippets
//!
//! `highlight` scans a snippet once, left to right, and wraps each token in
//! markup according to its class. Offsets passed in mark identifiers that
//! refer to types declared in the current package; those become in-page links.

mod lexer;
mod snippet;

pub use lexer::{is_builtin_type, is_keyword, Token};
pub use snippet::{collect_type_refs, DeclFormatter, Snippet, TypeNames};

use logos::Logos;
use std::collections::BTreeSet;
use std::fmt::Write;

/// Highlight `source`, linking identifiers that start at any of `type_refs`.
///
/// All text, marked up or not, is HTML-escaped.
pub fn highlight(source: &str, type_refs: &BTreeSet<usize>) -> String {
    let mut out = String::with_capacity(source.len() * 2);
    let mut lexer = Token::lexer(source);
    let mut last = 0;

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        if last < span.start {
            out.push_str(&escape_html(&source[last..span.start]));
        }

        let text = escape_html(lexer.slice());
        match token {
            _ if type_refs.contains(&span.start) => {
                let _ = write!(out, r##"<a href="#{0}">{0}</a>"##, text);
            }
            Ok(Token::Ident) if is_builtin_type(lexer.slice()) => {
                let _ = write!(out, r#"<span class="builtin">{}</span>"#, text);
            }
            Ok(Token::Ident) if is_keyword(lexer.slice()) => {
                let _ = write!(out, r#"<span class="keyword">{}</span>"#, text);
            }
            Ok(Token::Comment) => {
                let _ = write!(out, r#"<span class="comment">{}</span>"#, text);
            }
            Ok(Token::String) => {
                let _ = write!(out, r#"<span class="string">{}</span>"#, text);
            }
            _ => out.push_str(&text),
        }

        last = span.end;
    }

    if last < source.len() {
        out.push_str(&escape_html(&source[last..]));
    }

    out
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none() -> BTreeSet<usize> {
        BTreeSet::new()
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(escape_html("<div>"), "&lt;div&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#39;s");
    }

    #[test]
    fn test_keywords_and_builtins() {
        let html = highlight("func Len() int", &none());
        assert_eq!(
            html,
            r#"<span class="keyword">func</span> Len() <span class="builtin">int</span>"#
        );
    }

    #[test]
    fn test_type_reference_link() {
        let src = "func New() *Config";
        let offsets: BTreeSet<usize> = [src.find("Config").unwrap()].into_iter().collect();
        let html = highlight(src, &offsets);
        assert!(html.ends_with(r##"*<a href="#Config">Config</a>"##));
    }

    #[test]
    fn test_local_type_shadows_builtin() {
        let src = "type T struct{ v error }";
        let offsets: BTreeSet<usize> = [src.find("error").unwrap()].into_iter().collect();
        let html = highlight(src, &offsets);
        assert!(html.contains(r##"<a href="#error">error</a>"##));
        assert!(!html.contains(r#"<span class="builtin">error</span>"#));
    }

    #[test]
    fn test_only_marked_occurrence_is_linked() {
        let src = "var A, B Config = Config{}, Config{}";
        let first = src.find("Config").unwrap();
        let offsets: BTreeSet<usize> = [first].into_iter().collect();
        let html = highlight(src, &offsets);
        assert_eq!(html.matches("<a href").count(), 1);
    }

    #[test]
    fn test_comment_and_string_spans() {
        let html = highlight("const Name = \"gopher\" // the name", &none());
        assert!(html.contains(r#"<span class="string">&quot;gopher&quot;</span>"#));
        assert!(html.contains(r#"<span class="comment">// the name</span>"#));
    }

    #[test]
    fn test_block_comment_span() {
        let html = highlight("Timeout int /* seconds */", &none());
        assert!(html.contains(r#"<span class="comment">/* seconds */</span>"#));
        assert!(html.contains(r#"<span class="builtin">int</span>"#));
    }

    #[test]
    fn test_whitespace_is_preserved() {
        let src = "type T struct {\n\tA  int\n}";
        let html = highlight(src, &none());
        assert!(html.contains("{\n\tA  <span"));
        assert!(html.ends_with("\n}"));
    }

    #[test]
    fn test_markup_is_escaped_in_every_branch() {
        let src = "const X = \"<b>\" // <script>alert(1)</script>\nvar y = a<b && c>d";
        let html = highlight(src, &none());
        assert!(!html.contains("<b>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;b&gt;"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a&lt;b &amp;&amp; c&gt;d"));
    }

    #[test]
    fn test_lexer_errors_flush_escaped() {
        let html = highlight("x = \"<unterminated", &none());
        assert!(html.contains("&quot;"));
        assert!(html.contains("&lt;unterminated"));
        assert!(!html.contains("<unterminated"));
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(highlight("", &none()), "");
    }
}
