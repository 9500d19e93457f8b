//! Attribute and text sanitization of a parsed tag tree.
//!
//! Runs before the preset turns BBCode tags into HTML elements. It never
//! fails: disallowed attributes are dropped and raw text is entity-escaped.

use super::attrs::strip_unique_attr;
use super::escape::OPEN_BRACKET_REF;
use super::node::{ContentItem, TagNode};

/// Decides whether attribute `name` may stay on tag `tag`.
pub type AttributeFilter = fn(name: &str, tag: &str) -> bool;

/// Rejects event handler attributes (`onclick`, `OnLoad`, ...).
pub fn default_attribute_filter(name: &str, _tag: &str) -> bool {
    !name
        .get(..2)
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case("on"))
}

#[derive(Debug, Clone, Copy)]
pub struct SanitizerOptions {
    /// Pass text through unescaped, letting BBCode content carry live HTML.
    pub allow_html: bool,
    pub attribute_filter: AttributeFilter,
}

impl Default for SanitizerOptions {
    fn default() -> Self {
        SanitizerOptions {
            allow_html: false,
            attribute_filter: default_attribute_filter,
        }
    }
}

impl SanitizerOptions {
    pub fn with_allow_html(mut self, allow_html: bool) -> Self {
        self.allow_html = allow_html;
        self
    }

    pub fn with_attribute_filter(mut self, filter: AttributeFilter) -> Self {
        self.attribute_filter = filter;
        self
    }
}

/// Sanitize every node and text item in `content`, recursively.
pub fn sanitize(content: Vec<ContentItem>, options: &SanitizerOptions) -> Vec<ContentItem> {
    content
        .into_iter()
        .map(|item| match item {
            ContentItem::Text(s) if !options.allow_html => ContentItem::Text(escape_text(&s)),
            ContentItem::Node(node) => ContentItem::Node(sanitize_node(node, options)),
            other => other,
        })
        .collect()
}

/// Entity-escape text, keeping the references that stand in for brackets.
fn escape_text(s: &str) -> String {
    s.split(OPEN_BRACKET_REF)
        .map(|part| html_escape::encode_text(part))
        .collect::<Vec<_>>()
        .join(OPEN_BRACKET_REF)
}

fn sanitize_node(node: TagNode, options: &SanitizerOptions) -> TagNode {
    let TagNode { tag, attrs, content } = node;

    // The positional value is structural (the URL of `[url=...]`), so it is
    // exempt from the filter.
    let stripped = strip_unique_attr(&attrs);
    let mut attrs: crate::node::Attrs = stripped
        .attrs
        .into_iter()
        .filter(|(name, _)| {
            let keep = (options.attribute_filter)(name, &tag);
            if !keep {
                debug!("dropping attribute {:?} from [{}]", name, tag);
            }
            keep
        })
        .collect();
    if let Some(unique) = stripped.unique {
        attrs.insert(unique.clone(), unique);
    }

    TagNode {
        content: content.map(|c| sanitize(c, options)),
        tag,
        attrs,
    }
}
