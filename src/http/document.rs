//! HTML fragments shared by the fallback and listing responders.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when a file name becomes an href path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Minimal document head: doctype, charset and a base URL for `directory`.
pub fn base_document(directory: &str) -> String {
    format!(
        r#"<!doctype html><meta charset="utf-8"/><base href="{}"/>"#,
        escape_html(directory)
    )
}

/// Escape text for HTML content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Percent-encode a single path segment for use in an href.
pub fn encode_segment(name: &str) -> String {
    utf8_percent_encode(name, SEGMENT).to_string()
}
