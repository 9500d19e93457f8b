//! Escaping of values embedded in BBCode.
//!
//! Content and attribute positions need different treatment. Content is
//! delimited only by tags, so brackets are the only hazard. Attribute values
//! are additionally quote-delimited, so `"` must go too.

use std::borrow::Cow;

/// URL in content position, e.g. `[img]...[/img]`.
const URL_CONTENT: &[(char, &str)] = &[('[', "%5B"), (']', "%5D")];
/// URL in attribute position, e.g. `[url="..."]`.
const URL_ATTRIBUTE: &[(char, &str)] = &[('[', "%5B"), (']', "%5D"), ('"', "%22")];
/// Free text in attribute position, e.g. `[img alt="..."]`.
const TEXT_ATTRIBUTE: &[(char, &str)] = &[('[', "&#91;"), (']', "&#93;"), ('"', "&quot;")];

/// Character reference standing in for a `[` that would otherwise open a tag.
///
/// The sanitizer leaves it alone, so it reaches HTML as a literal bracket.
pub const OPEN_BRACKET_REF: &str = "&#91;";

/// Replace each character found in `escapes` with its replacement.
///
/// Borrows the input when nothing needs replacing.
fn replace_all<'a>(mut s: &'a str, escapes: &[(char, &str)]) -> Cow<'a, str> {
    let is_special = |c: char| escapes.iter().any(|&(e, _)| e == c);
    if !s.contains(is_special) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    while let Some(split) = s.find(is_special) {
        let (head, tail) = s.split_at(split);
        // Every escaped character is ASCII, so the first byte is the whole char.
        let victim = tail.as_bytes()[0] as char;
        out.push_str(head);
        if let Some(&(_, repl)) = escapes.iter().find(|&&(c, _)| c == victim) {
            out.push_str(repl);
        }
        s = &tail[1..];
    }
    out.push_str(s);
    Cow::Owned(out)
}

/// Escape a URL placed between an opening and closing tag.
pub fn escape_url_content(url: &str) -> Cow<str> {
    replace_all(url, URL_CONTENT)
}

/// Escape a URL placed inside a quoted tag argument.
pub fn escape_url_attribute(url: &str) -> Cow<str> {
    replace_all(url, URL_ATTRIBUTE)
}

/// Escape human-readable text placed inside a quoted tag argument.
///
/// Uses HTML character references so the value reads back unchanged once
/// it reaches an HTML attribute.
pub fn escape_text_attribute(text: &str) -> Cow<str> {
    replace_all(text, TEXT_ATTRIBUTE)
}
