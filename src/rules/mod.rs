//! HTML -> BBCode conversion rules.
//!
//! The data view is walked depth-first. Each element's children are converted
//! first; the resulting BBCode string is handed to the rules in order together
//! with the element. The first rule that matches decides the element's BBCode.
//! If none does, the element is transparent and contributes its children's
//! BBCode unchanged.
//!
//! Rules never mutate the element. A rule that settles a presentation signal
//! (say `font-weight: normal`, a veto against bold) reports it as consumed in
//! its [`Verdict`], and later rules for the same element no longer see it.

use std::collections::BTreeSet;

use super::dom::{Element, Node};
use super::parse::escape_tags;

mod block;
mod code;
mod font;
mod heading;
mod list;
mod media;
mod style;
mod table;

pub use self::block::{ParagraphRule, QuoteRule};
pub use self::code::{
    default_language_of, default_unset_language, CodeOptions, CodeRule, DEFAULT_LANGUAGE,
    LANGUAGE_CLASS_PREFIX,
};
pub use self::font::{ColorRule, SizeRule};
pub use self::heading::HeadingRule;
pub use self::list::{ListItemRule, ListRule};
pub use self::media::{ImgRule, UrlRule};
pub use self::style::{BoldRule, ItalicRule, StrikethroughRule, UnderlineRule};
pub use self::table::{TableCellRule, TableRowRule, TableRule, TableSectionRule};

/// Outcome of one rule for one element.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum RuleResult {
    /// The rule produced the element's BBCode.
    Matched(String),
    /// The rule has no opinion.
    Abstained,
}

/// Presentation signals a rule has settled.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Consumed {
    styles: BTreeSet<String>,
    classes: BTreeSet<String>,
}

impl Consumed {
    pub fn style(mut self, name: &str) -> Self {
        self.styles.insert(name.to_owned());
        self
    }

    pub fn class(mut self, name: &str) -> Self {
        self.classes.insert(name.to_owned());
        self
    }

    pub fn has_style(&self, name: &str) -> bool {
        self.styles.contains(name)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && self.classes.is_empty()
    }

    fn merge(&mut self, other: Consumed) {
        self.styles.extend(other.styles);
        self.classes.extend(other.classes);
    }
}

/// What a rule returns: its result and whatever signals it settled.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Verdict {
    pub result: RuleResult,
    pub consumed: Consumed,
}

impl Verdict {
    pub fn matched<S: Into<String>>(bbcode: S) -> Self {
        Verdict {
            result: RuleResult::Matched(bbcode.into()),
            consumed: Consumed::default(),
        }
    }

    pub fn abstain() -> Self {
        Verdict {
            result: RuleResult::Abstained,
            consumed: Consumed::default(),
        }
    }

    pub fn consuming_style(mut self, name: &str) -> Self {
        self.consumed = self.consumed.style(name);
        self
    }

    pub fn consuming_class(mut self, name: &str) -> Self {
        self.consumed = self.consumed.class(name);
        self
    }
}

/// An element as seen by a rule: its neighbourhood in the tree and the
/// signals earlier rules have already settled.
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    element: &'a Element,
    parent: Option<&'a Element>,
    next_sibling: Option<&'a Node>,
    consumed: &'a Consumed,
}

impl<'a> ElementView<'a> {
    pub fn new(element: &'a Element, consumed: &'a Consumed) -> Self {
        ElementView {
            element,
            parent: None,
            next_sibling: None,
            consumed,
        }
    }

    pub fn with_parent(mut self, parent: Option<&'a Element>) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_next_sibling(mut self, next: Option<&'a Node>) -> Self {
        self.next_sibling = next;
        self
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn name(&self) -> &'a str {
        &self.element.name
    }

    pub fn is(&self, names: &[&str]) -> bool {
        names.iter().any(|n| *n == self.element.name)
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.attr(name)
    }

    /// A style property, unless an earlier rule consumed it.
    pub fn style(&self, name: &str) -> Option<&'a str> {
        if self.consumed.has_style(name) {
            return None;
        }
        self.element.styles.get(name).map(String::as_str)
    }

    pub fn parent(&self) -> Option<&'a Element> {
        self.parent
    }

    pub fn next_sibling(&self) -> Option<&'a Node> {
        self.next_sibling
    }

    pub fn consumed(&self) -> &'a Consumed {
        self.consumed
    }
}

/// One unit of HTML -> BBCode conversion logic.
pub trait ProcessingRule: Send + Sync {
    /// Name for diagnostics.
    fn id(&self) -> &str;

    /// BBCode tags this rule produces; the tokenizer accepts exactly the
    /// union of these.
    fn tags(&self) -> &[&'static str] {
        &[]
    }

    /// Convert `element`, whose children already converted to `content`.
    ///
    /// Must abstain rather than panic on elements it does not handle.
    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict;
}

/// An ordered, immutable list of rules.
pub struct RuleSet {
    rules: Vec<Box<dyn ProcessingRule>>,
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::new(default_rules())
    }
}

/// The default rules, in the order they are tried.
///
/// The order is significant: `<i style="font-weight: bold">` is bold
/// because the bold rule runs first.
pub fn default_rules() -> Vec<Box<dyn ProcessingRule>> {
    vec![
        Box::new(BoldRule),
        Box::new(ItalicRule),
        Box::new(UnderlineRule),
        Box::new(StrikethroughRule),
        Box::new(ColorRule::default()),
        Box::new(SizeRule::default()),
        Box::new(HeadingRule),
        Box::new(ListRule),
        Box::new(ListItemRule),
        Box::new(QuoteRule),
        Box::new(TableRule),
        Box::new(TableSectionRule),
        Box::new(TableRowRule),
        Box::new(TableCellRule),
        Box::new(CodeRule::default()),
        Box::new(ImgRule),
        Box::new(UrlRule),
        Box::new(ParagraphRule),
    ]
}

impl RuleSet {
    pub fn new(rules: Vec<Box<dyn ProcessingRule>>) -> Self {
        RuleSet { rules }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.id())
    }

    /// Every BBCode tag some rule produces, without duplicates.
    pub fn allowed_tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = Vec::new();
        for tag in self.rules.iter().flat_map(|r| r.tags().iter().copied()) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }

    /// Run the rules against one element. `None` if all abstained.
    pub fn apply(&self, view: &ElementView<'_>, content: &str) -> Option<String> {
        let mut consumed = view.consumed().clone();
        for rule in &self.rules {
            let current = ElementView { consumed: &consumed, ..*view };
            let Verdict {
                result,
                consumed: settled,
            } = rule.to_data(&current, content);
            match result {
                RuleResult::Matched(bbcode) => {
                    trace!("<{}> matched rule {}", view.name(), rule.id());
                    return Some(bbcode);
                }
                RuleResult::Abstained => {
                    if !settled.is_empty() {
                        trace!("<{}> rule {} settled {:?}", view.name(), rule.id(), settled);
                    }
                    consumed.merge(settled);
                }
            }
        }
        None
    }

    /// Convert a list of sibling nodes to BBCode.
    ///
    /// Text that would read back as one of this set's tags is escaped,
    /// except inside `<pre>`, whose content ends up in a raw `[code]` body.
    pub fn convert(&self, nodes: &[Node], parent: Option<&Element>) -> String {
        let allowed = self.allowed_tags();
        let walk = Walk {
            allowed: &allowed,
            raw: parent.map_or(false, Walk::keeps_raw),
        };
        self.convert_nodes(nodes, parent, walk)
    }

    fn convert_nodes(&self, nodes: &[Node], parent: Option<&Element>, walk: Walk<'_>) -> String {
        let mut out = String::new();
        for (i, node) in nodes.iter().enumerate() {
            match node {
                Node::Text(s) if walk.raw => out.push_str(s),
                Node::Text(s) => out.push_str(&escape_tags(s, walk.allowed)),
                Node::Element(el) => {
                    out.push_str(&self.convert_element(el, parent, nodes.get(i + 1), walk))
                }
            }
        }
        out
    }

    /// Convert one element in its tree position; falls back to the
    /// children's BBCode when no rule matches.
    fn convert_element(
        &self,
        element: &Element,
        parent: Option<&Element>,
        next_sibling: Option<&Node>,
        walk: Walk<'_>,
    ) -> String {
        let content = self.convert_nodes(&element.children, Some(element), walk.enter(element));
        let consumed = Consumed::default();
        let view = ElementView::new(element, &consumed)
            .with_parent(parent)
            .with_next_sibling(next_sibling);
        self.apply(&view, &content).unwrap_or(content)
    }

    /// Convert a detached element. `None` if no rule matched it.
    pub fn element_to_bbcode(&self, element: &Element) -> Option<String> {
        let content = self.convert(&element.children, Some(element));
        let consumed = Consumed::default();
        self.apply(&ElementView::new(element, &consumed), &content)
    }
}

/// Per-subtree state of a conversion walk.
#[derive(Clone, Copy)]
struct Walk<'t> {
    allowed: &'t [&'static str],
    /// Text is copied verbatim.
    raw: bool,
}

impl<'t> Walk<'t> {
    fn keeps_raw(element: &Element) -> bool {
        element.name == "pre"
    }

    fn enter(self, element: &Element) -> Self {
        Walk {
            raw: self.raw || Walk::keeps_raw(element),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn convert(html: &str) -> String {
        RuleSet::default().convert(&parse_html(html), None)
    }

    #[test]
    fn unknown_elements_are_transparent() {
        assert_eq!(convert("<span>a<em>b</em></span>c"), "a[i]b[/i]c");
    }

    #[test]
    fn allowed_tags_cover_rules() {
        let tags = RuleSet::default().allowed_tags();
        for tag in &[
            "b", "i", "u", "s", "url", "img", "color", "size", "h1", "h6", "quote", "code",
            "list", "*", "table", "tr", "td", "th", "thead", "tbody", "tfoot",
        ] {
            assert!(tags.contains(tag), "missing {}", tag);
        }
        assert!(!tags.contains(&"p"));
    }

    #[test]
    fn default_order_is_stable() {
        let ids: Vec<_> = RuleSet::default().ids().map(str::to_owned).collect();
        assert_eq!(
            ids,
            vec![
                "bold",
                "italic",
                "underline",
                "strikethrough",
                "color",
                "size",
                "heading",
                "list",
                "list-item",
                "quote",
                "table",
                "table-section",
                "table-row",
                "table-cell",
                "code",
                "img",
                "url",
                "paragraph",
            ]
        );
    }

    struct Veto;

    impl ProcessingRule for Veto {
        fn id(&self) -> &str {
            "veto"
        }

        fn to_data(&self, _element: &ElementView<'_>, _content: &str) -> Verdict {
            Verdict::abstain().consuming_style("font-weight")
        }
    }

    #[test]
    fn consumed_signals_hide_from_later_rules() {
        let mut rules: Vec<Box<dyn ProcessingRule>> = vec![Box::new(Veto)];
        rules.extend(default_rules());
        let rules = RuleSet::new(rules);
        let span = Element::new("span")
            .with_style("font-weight", "bold")
            .with_child("x");
        assert_eq!(rules.element_to_bbcode(&span), None);
        assert_eq!(
            RuleSet::default().element_to_bbcode(&span).as_deref(),
            Some("[b]x[/b]")
        );
    }

    #[test]
    fn tag_like_text_is_escaped() {
        assert_eq!(convert("<p>[b]x[/b]</p>"), "&#91;b]x&#91;/b]\n\n");
        assert_eq!(convert("a [note] b"), "a [note] b");
        assert_eq!(
            convert("<pre><code>[b]x[/b]</code></pre>"),
            "[code]\n[b]x[/b]\n[/code]\n"
        );
    }

    #[test]
    fn first_match_wins() {
        // Both italic and bold signals; bold is tried first.
        assert_eq!(
            convert(r#"<i style="font-weight: bold">x</i>"#),
            "[b]x[/b]"
        );
    }
}
