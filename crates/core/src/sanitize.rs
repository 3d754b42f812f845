//! Escaping and sanitizing of remote strings
//!
//! Every string that comes from the articles API is untrusted. Each output
//! context has its own function:
//!
//! - [`escape_text`] for element text content
//! - [`escape_attr`] for double-quoted attribute values
//! - [`safe_url`] for `href`/`src` values (scheme allowlist, then escaping)
//! - [`sanitize_rich_text`] for descriptions, which may keep a small set of
//!   inline tags

use scraper::{ElementRef, Html, Node};

/// Inline elements kept by [`sanitize_rich_text`]
const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "b", "br", "code", "del", "em", "i", "mark", "s", "small", "strong", "sub",
    "sup", "u",
];

/// Elements dropped together with everything inside them
const DROPPED_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "svg", "math",
];

/// Escape a string for use as element text
pub fn escape_text(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Escape a string for use inside a double-quoted attribute value
pub fn escape_attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Collapse runs of whitespace (including newlines and tabs) into single
/// spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Validate a remote URL for use in `href` or `src`
///
/// Only absolute `http` and `https` URLs are accepted. Surrounding whitespace
/// is trimmed, and whitespace or control characters inside the URL are
/// percent-encoded before the scheme check, so `java\tscript:` style tricks
/// don't slip through. Returns the attribute-escaped URL.
pub fn safe_url(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim_matches(|c: char| c.is_whitespace() || c.is_control());

    let mut encoded = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        if c.is_whitespace() || c.is_control() {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                encoded.push_str(&format!("%{byte:02X}"));
            }
        } else {
            encoded.push(c);
        }
    }

    let lower = encoded.to_ascii_lowercase();
    let has_host = |prefix: &str| lower.len() > prefix.len() && lower.starts_with(prefix);

    if has_host("http://") || has_host("https://") {
        Some(escape_attr(&encoded))
    } else {
        None
    }
}

/// Sanitize a rich-text fragment down to a small set of inline tags
///
/// Allowed elements keep only their safe attributes (`href` and `title` on
/// links, `title` on abbreviations). Elements whose content is never text are
/// removed entirely; any other element is unwrapped and its children kept.
/// All text is re-escaped on the way out.
pub fn sanitize_rich_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    write_children(fragment.root_element(), &mut out);
    out.trim().to_string()
}

fn write_children(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    write_element(child_element, out);
                }
            }
            _ => {}
        }
    }
}

fn write_element(element: ElementRef, out: &mut String) {
    let name = element.value().name();

    if DROPPED_TAGS.contains(&name) {
        return;
    }

    if !ALLOWED_TAGS.contains(&name) {
        write_children(element, out);
        return;
    }

    if name == "br" {
        out.push_str("<br />");
        return;
    }

    out.push('<');
    out.push_str(name);

    match name {
        "a" => {
            if let Some(href) = safe_url(element.value().attr("href")) {
                out.push_str(&format!(" href=\"{href}\""));
            }
            push_title_attr(element, out);
        }
        "abbr" => push_title_attr(element, out),
        _ => {}
    }

    out.push('>');
    write_children(element, out);
    out.push_str(&format!("</{name}>"));
}

fn push_title_attr(element: ElementRef, out: &mut String) {
    if let Some(title) = element.value().attr("title") {
        out.push_str(&format!(" title=\"{}\"", escape_attr(title)));
    }
}
