//! BBCode tag tree to HTML element tree.
//!
//! A [`Preset`] is a table from BBCode tag name to a transform function. The
//! walk is top-down: a transform receives its raw node and decides itself
//! whether and how to recurse into the content (via [`Preset::process`]).
//! Tags without an entry keep their name and have their content processed.

use std::collections::HashMap;

use html_escape::decode_html_entities;

use super::attrs::{strip_unique_attr, unique_attr_to_attr};
use super::css::{parse_color, parse_font_size};
use super::error::{Error, Result};
use super::node::{split_lines, Attrs, ContentItem, TagNode};
use super::paragraph::{paragraph_aware_content, ParagraphOptions};
use super::rules::{DEFAULT_LANGUAGE, LANGUAGE_CLASS_PREFIX};

/// Name of the synthetic node wrapped around the whole tree.
pub const ROOT_TAG: &str = "root";

/// Turns one BBCode node into zero or more HTML items.
pub type TagTransform = fn(TagNode, &Preset) -> Vec<ContentItem>;

/// Block tags of the CKEditor 5 preset. Code blocks and headings are never
/// wrapped in a paragraph either.
pub const CKEDITOR5_BLOCK_TAGS: &[&str] = &[
    "quote", "table", "list", "code", "h1", "h2", "h3", "h4", "h5", "h6",
];

#[derive(Clone)]
pub struct Preset {
    transforms: HashMap<String, TagTransform>,
    paragraphs: ParagraphOptions,
}

impl Default for Preset {
    fn default() -> Self {
        Preset::ckeditor5()
    }
}

impl Preset {
    /// A preset with no transforms at all: every tag keeps its name.
    pub fn empty() -> Self {
        Preset {
            transforms: HashMap::new(),
            paragraphs: ParagraphOptions::default(),
        }
    }

    /// Plain HTML5 mapping of the common BBCode tags. No paragraphs.
    pub fn html5() -> Self {
        Preset::empty()
            .with_transform("b", |node, preset| wrap("strong", node, preset))
            .with_transform("i", |node, preset| wrap("i", node, preset))
            .with_transform("u", |node, preset| wrap("u", node, preset))
            .with_transform("s", |node, preset| wrap("s", node, preset))
            .with_transform("h1", same_name)
            .with_transform("h2", same_name)
            .with_transform("h3", same_name)
            .with_transform("h4", same_name)
            .with_transform("h5", same_name)
            .with_transform("h6", same_name)
            .with_transform("color", color)
            .with_transform("size", size)
            .with_transform("url", url)
            .with_transform("img", img)
            .with_transform("quote", |node, preset| wrap("blockquote", node, preset))
            .with_transform("code", |mut node, _| {
                vec![TagNode::new("pre")
                    .with_content(node.take_content())
                    .into()]
            })
            .with_transform("list", list)
            .with_transform("*", |node, preset| wrap("li", node, preset))
            .with_transform("table", rows)
            .with_transform("thead", rows)
            .with_transform("tbody", rows)
            .with_transform("tfoot", rows)
            .with_transform("tr", rows)
            .with_transform("td", same_name)
            .with_transform("th", same_name)
    }

    /// The HTML5 table plus the paragraph handling and code block markup of
    /// the CKEditor 5 data format.
    pub fn ckeditor5() -> Self {
        Preset::html5()
            .with_paragraph_options(
                ParagraphOptions::default().with_block_tags(CKEDITOR5_BLOCK_TAGS.iter().copied()),
            )
            .with_transform(ROOT_TAG, |node, preset| {
                paragraph_container(ROOT_TAG, node, preset, true)
            })
            .with_transform("td", |node, preset| paragraph_container("td", node, preset, false))
            .with_transform("th", |node, preset| paragraph_container("th", node, preset, false))
            .with_transform("*", |node, preset| paragraph_container("li", node, preset, false))
            .with_transform("quote", |node, preset| {
                paragraph_container("blockquote", node, preset, true)
            })
            .with_transform("code", code_block)
    }

    /// Register `transform` for `tag`, replacing any earlier entry.
    pub fn with_transform<S: Into<String>>(mut self, tag: S, transform: TagTransform) -> Self {
        self.transforms.insert(tag.into(), transform);
        self
    }

    pub fn with_paragraph_options(mut self, options: ParagraphOptions) -> Self {
        self.paragraphs = options;
        self
    }

    pub fn paragraph_options(&self) -> &ParagraphOptions {
        &self.paragraphs
    }

    pub fn has_transform(&self, tag: &str) -> bool {
        self.transforms.contains_key(tag)
    }

    /// Transform every node of `content`.
    pub fn process(&self, content: Vec<ContentItem>) -> Vec<ContentItem> {
        let mut out = Vec::with_capacity(content.len());
        for item in content {
            match item {
                ContentItem::Node(node) => out.extend(self.process_node(node)),
                other => out.push(other),
            }
        }
        out
    }

    /// Transform a single node.
    pub fn process_node(&self, node: TagNode) -> Vec<ContentItem> {
        match self.transforms.get(node.tag.as_str()) {
            Some(transform) => transform(node, self),
            None => {
                let content = node.content.map(|c| self.process(c));
                vec![TagNode { content, ..node }.into()]
            }
        }
    }

    /// Split `content` into paragraphs, then transform it.
    pub fn paragraphs(&self, content: Vec<ContentItem>, require_paragraph: bool) -> Vec<ContentItem> {
        let options = self
            .paragraphs
            .clone()
            .with_require_paragraph(require_paragraph);
        self.process(paragraph_aware_content(content, &options))
    }

    /// Transform a whole document.
    ///
    /// The content is wrapped in a [`ROOT_TAG`] node so a root transform can
    /// treat the top level like any container, and unwrapped afterwards. The
    /// root transform must hand back exactly one container named
    /// [`ROOT_TAG`].
    pub fn transform(&self, content: Vec<ContentItem>) -> Result<Vec<ContentItem>> {
        let root = TagNode::new(ROOT_TAG).with_content(content);
        let mut out = self.process_node(root);
        let found = out.len();
        match out.pop() {
            Some(ContentItem::Node(TagNode {
                tag,
                content: Some(content),
                ..
            })) if found == 1 && tag == ROOT_TAG => Ok(content),
            _ => Err(Error::MalformedTree(format!(
                "expected a single <{}> container after the walk, got {} item(s)",
                ROOT_TAG, found
            ))),
        }
    }
}

/// Entity references in attribute values are decoded: the renderer escapes
/// attribute values again on output.
fn decoded(attrs: Attrs) -> Attrs {
    attrs
        .into_iter()
        .map(|(k, v)| {
            let v = decode_html_entities(&v).into_owned();
            (k, v)
        })
        .collect()
}

fn wrap(tag: &str, mut node: TagNode, preset: &Preset) -> Vec<ContentItem> {
    let content = preset.process(node.take_content());
    vec![TagNode::new(tag).with_content(content).into()]
}

fn same_name(node: TagNode, preset: &Preset) -> Vec<ContentItem> {
    let tag = node.tag.clone();
    wrap(&tag, node, preset)
}

fn paragraph_container(
    tag: &str,
    mut node: TagNode,
    preset: &Preset,
    require_paragraph: bool,
) -> Vec<ContentItem> {
    let content = preset.paragraphs(node.take_content(), require_paragraph);
    vec![TagNode::new(tag).with_content(content).into()]
}

/// Containers that only hold other elements. Whitespace between them goes.
fn rows(mut node: TagNode, preset: &Preset) -> Vec<ContentItem> {
    let content = node
        .take_content()
        .into_iter()
        .filter(|item| !item.is_blank())
        .collect();
    vec![TagNode::new(node.tag).with_content(preset.process(content)).into()]
}

fn color(mut node: TagNode, preset: &Preset) -> Vec<ContentItem> {
    let content = preset.process(node.take_content());
    let value = strip_unique_attr(&node.attrs)
        .unique
        .map(|v| v.trim().to_owned())
        .filter(|v| parse_color(v).is_some());
    match value {
        Some(value) => vec![TagNode::new("span")
            .with_attr("style", format!("color: {}", value))
            .with_content(content)
            .into()],
        None => {
            debug!("dropping [color] without a valid color");
            content
        }
    }
}

fn size(mut node: TagNode, preset: &Preset) -> Vec<ContentItem> {
    let content = preset.process(node.take_content());
    let value = strip_unique_attr(&node.attrs)
        .unique
        .filter(|v| v.trim().chars().all(|c| c.is_ascii_digit() || c == '.'))
        .and_then(|v| parse_font_size(&v));
    match value {
        Some(px) => vec![TagNode::new("span")
            .with_attr("style", format!("font-size: {}px", px))
            .with_content(content)
            .into()],
        None => {
            debug!("dropping [size] without a numeric size");
            content
        }
    }
}

fn url(mut node: TagNode, preset: &Preset) -> Vec<ContentItem> {
    let text = node.text_content();
    let attrs = unique_attr_to_attr(
        "href",
        &node.attrs,
        true,
        Some(|| text.trim().to_owned()),
    );
    let content = preset.process(node.take_content());
    vec![TagNode::new("a")
        .with_attrs(decoded(attrs))
        .with_content(content)
        .into()]
}

fn img(node: TagNode, _: &Preset) -> Vec<ContentItem> {
    let src = decode_html_entities(node.text_content().trim()).into_owned();
    if src.is_empty() {
        debug!("dropping [img] without a source");
        return Vec::new();
    }
    let mut attrs = Attrs::new();
    attrs.insert("src".to_owned(), src);
    for (k, v) in decoded(strip_unique_attr(&node.attrs).attrs) {
        if k != "src" {
            attrs.insert(k, v);
        }
    }
    vec![TagNode::void("img").with_attrs(attrs).into()]
}

fn list(mut node: TagNode, preset: &Preset) -> Vec<ContentItem> {
    let kind = strip_unique_attr(&node.attrs).unique;
    let items = node
        .take_content()
        .into_iter()
        .filter(|item| !item.is_blank())
        .collect();
    let list = match kind.as_deref().map(str::trim) {
        None => TagNode::new("ul"),
        Some(kind @ "a") | Some(kind @ "A") | Some(kind @ "i") | Some(kind @ "I") => {
            TagNode::new("ol").with_attr("type", kind)
        }
        Some(_) => TagNode::new("ol"),
    };
    vec![list.with_content(preset.process(items)).into()]
}

/// `[code=lang]` to `<pre><code class="language-lang">`.
///
/// The body is raw text, so it is not processed further.
fn code_block(node: TagNode, _: &Preset) -> Vec<ContentItem> {
    let attrs = unique_attr_to_attr(
        "language",
        &node.attrs,
        true,
        Some(|| DEFAULT_LANGUAGE.to_owned()),
    );
    let language: String = attrs
        .get("language")
        .map(|lang| {
            lang.chars()
                .filter(|c| c.is_ascii_alphanumeric() || "-_+#.".contains(*c))
                .collect()
        })
        .unwrap_or_default();
    let language = if language.is_empty() {
        DEFAULT_LANGUAGE.to_owned()
    } else {
        language
    };

    // Indentation of the first line is content.
    let text = node.text_content();
    let code = TagNode::new("code")
        .with_attr("class", format!("{}{}", LANGUAGE_CLASS_PREFIX, language))
        .with_content(split_lines(text.trim_matches('\n').trim_end()));
    vec![TagNode::new("pre").with_content(vec![code.into()]).into()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ContentItem::Eol;
    use crate::parse::parse;
    use crate::render::to_html;

    const TAGS: &[&str] = &[
        "b", "i", "u", "s", "color", "size", "h1", "h2", "list", "*", "quote", "table", "tbody",
        "tr", "td", "th", "code", "img", "url",
    ];

    fn html(preset: &Preset, bbcode: &str) -> String {
        let tree = preset.transform(parse(bbcode, TAGS)).unwrap();
        to_html(&tree).unwrap()
    }

    fn ck(bbcode: &str) -> String {
        html(&Preset::ckeditor5(), bbcode)
    }

    #[test]
    fn root_gets_paragraphs() {
        assert_eq!(ck("[b]Hi[/b]"), "<p><strong>Hi</strong></p>");
        assert_eq!(ck("one\n\ntwo"), "<p>one</p><p>two</p>");
        assert_eq!(ck("one\ntwo"), "<p>one\ntwo</p>");
        assert_eq!(ck(""), "<p></p>");
    }

    #[test]
    fn html5_has_no_paragraphs() {
        assert_eq!(html(&Preset::html5(), "a\n\nb"), "a\n\nb");
    }

    #[test]
    fn quote_forces_paragraphs() {
        assert_eq!(
            ck("[quote]hello[/quote]"),
            "<blockquote><p>hello</p></blockquote>"
        );
    }

    #[test]
    fn quote_author_is_dropped() {
        assert_eq!(
            ck("[quote=Batman]I'm batman[/quote]"),
            "<blockquote><p>I'm batman</p></blockquote>"
        );
    }

    #[test]
    fn code_block_with_language() {
        assert_eq!(
            ck("[code=css]\nX\n[/code]"),
            "<pre><code class=\"language-css\">X</code></pre>"
        );
        assert_eq!(
            ck("[code]  a\n[b]b[/b][/code]"),
            "<pre><code class=\"language-plaintext\">  a\n[b]b[/b]</code></pre>"
        );
    }

    #[test]
    fn code_block_keeps_first_line_indent() {
        assert_eq!(
            ck("[code]\n\n  indented\n    more  \n\n[/code]"),
            "<pre><code class=\"language-plaintext\">  indented\n    more</code></pre>"
        );
    }

    #[test]
    fn code_language_is_filtered() {
        assert_eq!(
            ck("[code=\"c<x>\"]y[/code]"),
            "<pre><code class=\"language-cx\">y</code></pre>"
        );
    }

    #[test]
    fn lists() {
        assert_eq!(
            ck("[list]\n[*] a\n[*] b\n[/list]"),
            "<ul><li> a\n</li><li> b\n</li></ul>"
        );
        assert_eq!(ck("[list=a][*]x[/list]"), "<ol type=\"a\"><li>x</li></ol>");
        assert_eq!(ck("[list=1][*]x[/list]"), "<ol><li>x</li></ol>");
    }

    #[test]
    fn list_item_paragraphs() {
        assert_eq!(
            ck("[list][*]a\n\nb[/list]"),
            "<ul><li><p>a</p><p>b</p></li></ul>"
        );
    }

    #[test]
    fn table_whitespace_is_dropped() {
        assert_eq!(
            ck("x[table]\n[tr]\n[td]a[/td]\n[/tr]\n[/table]"),
            "<p>x</p><table><tr><td>a</td></tr></table>"
        );
    }

    #[test]
    fn block_between_text() {
        assert_eq!(
            ck("lorem[quote]q[/quote]dolor"),
            "<p>lorem</p><blockquote><p>q</p></blockquote><p>dolor</p>"
        );
    }

    #[test]
    fn url_forms() {
        assert_eq!(
            ck("[url]https://x/?a=1&b=2[/url]"),
            "<p><a href=\"https://x/?a=1&amp;b=2\">https://x/?a=1&b=2</a></p>"
        );
        assert_eq!(
            ck("[url=https://x/]X[/url]"),
            "<p><a href=\"https://x/\">X</a></p>"
        );
        assert_eq!(
            ck("[url=\"https://x/\" href=https://y/]X[/url]"),
            "<p><a href=\"https://x/\">X</a></p>"
        );
    }

    #[test]
    fn images() {
        assert_eq!(
            ck("[img alt=\"a &quot;b&quot;\"]https://e.com/a.png[/img]"),
            "<p><img src=\"https://e.com/a.png\" alt=\"a &quot;b&quot;\"></p>"
        );
        assert_eq!(ck("x[img][/img]y"), "<p>xy</p>");
    }

    #[test]
    fn color_and_size() {
        assert_eq!(
            ck("[color=red]r[/color]"),
            "<p><span style=\"color: red\">r</span></p>"
        );
        assert_eq!(
            ck("[color=#ABCDEF]r[/color]"),
            "<p><span style=\"color: #ABCDEF\">r</span></p>"
        );
        assert_eq!(ck("[color=\"red;x:y\"]r[/color]"), "<p>r</p>");
        assert_eq!(
            ck("[size=20]big[/size]"),
            "<p><span style=\"font-size: 20px\">big</span></p>"
        );
        assert_eq!(ck("[size=huge]big[/size]"), "<p>big</p>");
    }

    #[test]
    fn headings_are_blocks() {
        assert_eq!(ck("text\n[h1]T[/h1]"), "<p>text</p><h1>T</h1>");
        // A leading block still gets the mandated paragraph in front.
        assert_eq!(ck("[h2]T[/h2]"), "<p></p><h2>T</h2>");
    }

    #[test]
    fn ckeditor5_extends_html5() {
        let html5 = Preset::html5();
        let ck = Preset::ckeditor5();
        assert!(!html5.has_transform(ROOT_TAG));
        assert!(ck.has_transform(ROOT_TAG));
        for tag in ["b", "url", "img", "list", "*", "code", "td"] {
            assert!(html5.has_transform(tag), "{}", tag);
            assert!(ck.has_transform(tag), "{}", tag);
        }
        assert!(!ck.has_transform("p"));

        assert!(!html5.paragraph_options().is_block("code"));
        for tag in CKEDITOR5_BLOCK_TAGS {
            assert!(ck.paragraph_options().is_block(tag), "{}", tag);
        }
    }

    #[test]
    fn unknown_tags_pass_through() {
        let preset = Preset::empty();
        let tree = preset
            .transform(vec![TagNode::new("p")
                .with_content(vec!["x".into(), Eol])
                .into()])
            .unwrap();
        assert_eq!(to_html(&tree).unwrap(), "<p>x\n</p>");
    }

    #[test]
    fn broken_root_transform_is_an_error() {
        let preset = Preset::html5().with_transform(ROOT_TAG, |mut node, _| node.take_content());
        match preset.transform(vec!["a".into(), "b".into()]) {
            Err(Error::MalformedTree(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
