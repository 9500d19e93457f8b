//! Links and images.
//!
//! Both need a non-empty URL. Without one the rule abstains instead of
//! emitting a tag with nothing to point at.

use super::{ElementView, ProcessingRule, Verdict};
use crate::escape::{escape_text_attribute, escape_url_attribute, escape_url_content};

fn non_empty<'a>(element: &ElementView<'a>, name: &str) -> Option<&'a str> {
    element.attr(name).map(str::trim).filter(|v| !v.is_empty())
}

/// `<img src alt>` to `[img alt="..."]src[/img]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImgRule;

impl ProcessingRule for ImgRule {
    fn id(&self) -> &str {
        "img"
    }

    fn tags(&self) -> &[&'static str] {
        &["img"]
    }

    fn to_data(&self, element: &ElementView<'_>, _content: &str) -> Verdict {
        if element.name() != "img" {
            return Verdict::abstain();
        }
        let src = match non_empty(element, "src") {
            Some(src) => src,
            None => return Verdict::abstain(),
        };
        let open = match element.attr("alt") {
            Some(alt) => format!("[img alt=\"{}\"]", escape_text_attribute(alt)),
            None => "[img]".to_owned(),
        };
        Verdict::matched(format!("{}{}[/img]", open, escape_url_content(src)))
    }
}

/// `<a href>` to `[url]`.
///
/// When the link text is exactly the URL the short form `[url]...[/url]` is
/// used.
#[derive(Debug, Default, Clone, Copy)]
pub struct UrlRule;

impl ProcessingRule for UrlRule {
    fn id(&self) -> &str {
        "url"
    }

    fn tags(&self) -> &[&'static str] {
        &["url"]
    }

    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict {
        if element.name() != "a" {
            return Verdict::abstain();
        }
        let href = match non_empty(element, "href") {
            Some(href) => href,
            None => return Verdict::abstain(),
        };
        let escaped = escape_url_attribute(href);
        if escaped == href && content == href {
            Verdict::matched(format!("[url]{}[/url]", content))
        } else {
            Verdict::matched(format!("[url=\"{}\"]{}[/url]", escaped, content))
        }
    }
}
