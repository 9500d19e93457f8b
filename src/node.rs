//! The tag tree shared by the tokenizer, sanitizer, preset and renderer.

use indexmap::IndexMap;

/// Insertion-ordered attribute map.
///
/// Order matters: the positional argument of `[tag=value]` is stored as the
/// last entry whose key equals its value (see [`crate::attrs`]).
pub type Attrs = IndexMap<String, String>;

/// One item of a node's content.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum ContentItem {
    /// A run of text containing no line breaks.
    Text(String),
    /// A single line break. Consecutive breaks are consecutive items.
    Eol,
    /// A nested tag.
    Node(TagNode),
}

impl ContentItem {
    pub fn text<S: Into<String>>(s: S) -> Self {
        ContentItem::Text(s.into())
    }

    pub fn as_node(&self) -> Option<&TagNode> {
        match self {
            ContentItem::Node(node) => Some(node),
            _ => None,
        }
    }

    /// True for line breaks and text made only of whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            ContentItem::Eol => true,
            ContentItem::Text(s) => s.trim().is_empty(),
            ContentItem::Node(_) => false,
        }
    }
}

impl From<TagNode> for ContentItem {
    fn from(node: TagNode) -> Self {
        ContentItem::Node(node)
    }
}

impl<'a> From<&'a str> for ContentItem {
    fn from(s: &'a str) -> Self {
        ContentItem::Text(s.to_owned())
    }
}

/// A markup element.
///
/// `content == None` is a void element (`<img>`); `Some(vec![])` is an empty
/// container (`<p></p>`). The two render differently and are kept apart.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct TagNode {
    pub tag: String,
    pub attrs: Attrs,
    pub content: Option<Vec<ContentItem>>,
}

impl TagNode {
    /// An empty container named `tag`.
    pub fn new<S: Into<String>>(tag: S) -> Self {
        TagNode {
            tag: tag.into(),
            attrs: Attrs::new(),
            content: Some(Vec::new()),
        }
    }

    /// A void element named `tag`.
    pub fn void<S: Into<String>>(tag: S) -> Self {
        TagNode {
            content: None,
            ..TagNode::new(tag)
        }
    }

    pub fn with_attr<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_content(mut self, content: Vec<ContentItem>) -> Self {
        self.content = Some(content);
        self
    }

    /// Append to the content, turning a void element into a container.
    ///
    /// Adjacent text items are merged.
    pub fn push(&mut self, item: ContentItem) {
        let content = self.content.get_or_insert_with(Vec::new);
        if let (Some(ContentItem::Text(last)), ContentItem::Text(s)) = (content.last_mut(), &item) {
            last.push_str(s);
            return;
        }
        content.push(item);
    }

    /// Take the content out, leaving an empty container.
    pub fn take_content(&mut self) -> Vec<ContentItem> {
        self.content.replace(Vec::new()).unwrap_or_default()
    }

    /// Concatenated text of all descendants, with line breaks as `\n`.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        if let Some(content) = &self.content {
            collect_text(content, &mut out);
        }
        out
    }
}

pub(crate) fn collect_text(content: &[ContentItem], out: &mut String) {
    for item in content {
        match item {
            ContentItem::Text(s) => out.push_str(s),
            ContentItem::Eol => out.push('\n'),
            ContentItem::Node(node) => {
                if let Some(children) = &node.content {
                    collect_text(children, out);
                }
            }
        }
    }
}

/// Split raw text into text runs and line breaks.
pub(crate) fn split_lines(s: &str) -> Vec<ContentItem> {
    let mut out = Vec::new();
    for (i, line) in s.split('\n').enumerate() {
        if i > 0 {
            out.push(ContentItem::Eol);
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !line.is_empty() {
            out.push(ContentItem::text(line));
        }
    }
    out
}

#[test]
fn push_merges_text() {
    let mut node = TagNode::new("b");
    node.push("foo".into());
    node.push("bar".into());
    node.push(ContentItem::Eol);
    node.push("baz".into());
    assert_eq!(
        node.content,
        Some(vec![
            ContentItem::text("foobar"),
            ContentItem::Eol,
            ContentItem::text("baz"),
        ])
    );
}

#[test]
fn void_and_empty_differ() {
    assert_ne!(TagNode::void("p"), TagNode::new("p"));
    let mut img = TagNode::void("img");
    assert_eq!(img.take_content(), vec![]);
    assert_eq!(img.content, Some(vec![]));
}

#[test]
fn text_content_flattens() {
    let node = TagNode::new("quote").with_content(vec![
        "a".into(),
        ContentItem::Eol,
        TagNode::new("b").with_content(vec!["c".into()]).into(),
    ]);
    assert_eq!(node.text_content(), "a\nc");
}
