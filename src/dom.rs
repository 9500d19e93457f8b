//! The HTML-like data view consumed by the BBCode rules.
//!
//! Presentation arrives as a resolved inline style map and a class list
//! rather than raw `style`/`class` attributes.

use indexmap::IndexMap;
use scraper::{ElementRef, Html, Node as HtmlNode};

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl<'a> From<&'a str> for Node {
    fn from(s: &'a str) -> Self {
        Node::Text(s.to_owned())
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Element {
    /// Lower-case element name.
    pub name: String,
    /// Attributes other than `style` and `class`.
    pub attrs: IndexMap<String, String>,
    /// Inline style properties, names lower-case.
    pub styles: IndexMap<String, String>,
    pub classes: Vec<String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Element {
            name: name.into().to_ascii_lowercase(),
            ..Element::default()
        }
    }

    pub fn with_attr<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_style<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.styles
            .insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_class<S: Into<String>>(mut self, class: S) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_child<N: Into<Node>>(mut self, child: N) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(s) => out.push_str(s),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

/// Read an HTML fragment into data view nodes.
pub fn parse_html(html: &str) -> Vec<Node> {
    let document = Html::parse_fragment(html);
    // The fragment parser hangs everything off a synthetic <html> element.
    convert_children(document.root_element())
}

fn convert_children(element: ElementRef) -> Vec<Node> {
    let mut out = Vec::new();
    for child in element.children() {
        match child.value() {
            HtmlNode::Text(text) => out.push(Node::Text(text.text.to_string())),
            HtmlNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    out.push(Node::Element(convert_element(child_element)));
                }
            }
            _ => {}
        }
    }
    out
}

fn convert_element(element: ElementRef) -> Element {
    let mut out = Element::new(element.value().name());
    for (name, value) in element.value().attrs() {
        match name {
            "style" => out.styles.extend(parse_style(value)),
            "class" => out
                .classes
                .extend(value.split_whitespace().map(str::to_owned)),
            _ => {
                out.attrs.insert(name.to_owned(), value.to_owned());
            }
        }
    }
    out.children = convert_children(element);
    out
}

/// Split `a: b; c: d` into property pairs. No CSS parsing beyond that.
pub fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_owned()))
        .filter(|(k, v)| !k.is_empty() && !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_elements_and_text() {
        let nodes = parse_html("a<b>c</b>");
        assert_eq!(
            nodes,
            vec![Node::from("a"), Element::new("b").with_child("c").into()]
        );
    }

    #[test]
    fn style_and_class_are_resolved() {
        let nodes = parse_html(
            r#"<span style="font-weight: bold; COLOR:red;" class="x  y" title="t">z</span>"#,
        );
        let span = nodes[0].as_element().unwrap();
        assert_eq!(span.styles["font-weight"], "bold");
        assert_eq!(span.styles["color"], "red");
        assert_eq!(span.classes, vec!["x", "y"]);
        assert_eq!(span.attr("title"), Some("t"));
        assert_eq!(span.attr("style"), None);
    }

    #[test]
    fn entities_decoded() {
        let nodes = parse_html("<p>a &amp; &lt;b&gt;</p>");
        assert_eq!(nodes[0].as_element().unwrap().text_content(), "a & <b>");
    }

    #[test]
    fn style_parsing_skips_garbage() {
        assert_eq!(
            parse_style("; color : blue;;nonsense; x:"),
            vec![("color".to_owned(), "blue".to_owned())]
        );
    }
}
