//! Bold, italic, underline and strikethrough.
//!
//! Each has a set of equivalent element names and a style property. The
//! style wins over the name: `<b style="font-weight: normal">` is not bold,
//! `<span style="font-weight: 700">` is.

use super::{ElementView, Verdict};

/// Shared body of the rules declared with `style_rule!`.
pub(crate) fn wrap_styled(
    element: &ElementView<'_>,
    content: &str,
    bbcode: &str,
    elements: &[&str],
    style: &str,
    decide: fn(&str) -> Option<bool>,
) -> Verdict {
    let wrap = || format!("[{0}]{1}[/{0}]", bbcode, content);

    if let Some(value) = element.style(style) {
        match decide(value.trim()) {
            Some(true) => return Verdict::matched(wrap()).consuming_style(style),
            Some(false) => return Verdict::abstain().consuming_style(style),
            None => {}
        }
    }

    if element.is(elements) {
        Verdict::matched(wrap())
    } else {
        Verdict::abstain()
    }
}

/// `font-weight`: keywords, or a number compared against 400.
fn decide_weight(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "bold" | "bolder" => Some(true),
        "normal" | "lighter" => Some(false),
        other => other.parse::<f64>().ok().map(|w| w > 400.0),
    }
}

fn decide_font_style(value: &str) -> Option<bool> {
    let value = value.to_ascii_lowercase();
    match value.split_whitespace().next() {
        Some("italic") | Some("oblique") => Some(true),
        Some("normal") => Some(false),
        _ => None,
    }
}

/// `text-decoration` is a list; `keyword` anywhere in it decides.
fn decide_decoration(value: &str, keyword: &str) -> Option<bool> {
    let value = value.to_ascii_lowercase();
    if value.split_whitespace().any(|v| v == keyword) {
        Some(true)
    } else if value == "none" {
        Some(false)
    } else {
        None
    }
}

style_rule!(
    /// `<b>`, `<strong>` or `font-weight` above 400 to `[b]`.
    BoldRule {
        id: "bold",
        bbcode: "b",
        elements: ["b", "strong"],
        style: "font-weight",
        decide: decide_weight,
    }
);

style_rule!(
    /// `<i>`, `<em>` or `font-style: italic|oblique` to `[i]`.
    ItalicRule {
        id: "italic",
        bbcode: "i",
        elements: ["i", "em"],
        style: "font-style",
        decide: decide_font_style,
    }
);

style_rule!(
    UnderlineRule {
        id: "underline",
        bbcode: "u",
        elements: ["u", "ins"],
        style: "text-decoration",
        decide: |v| decide_decoration(v, "underline"),
    }
);

style_rule!(
    StrikethroughRule {
        id: "strikethrough",
        bbcode: "s",
        elements: ["s", "del", "strike"],
        style: "text-decoration",
        decide: |v| decide_decoration(v, "line-through"),
    }
);
