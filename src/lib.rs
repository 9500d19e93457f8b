//! Two-way conversion between [bbcode](https://en.wikipedia.org/wiki/BBCode)
//! and HTML as produced and consumed by a CKEditor 5 style editor.
//!
//! BBCode to HTML goes through a tag tree: the BBCode is tokenized, its
//! attributes and text are sanitized, a [`Preset`] maps every tag to HTML
//! elements (inserting paragraphs where blank lines were) and the tree is
//! rendered.
//!
//! HTML to BBCode walks an element tree bottom-up and asks an ordered
//! [`RuleSet`] what each element becomes.
//!
//! ```
//! use bbcode_bridge::{bbcode2html, html2bbcode};
//!
//! assert_eq!(bbcode2html("[b]Hi[/b]").unwrap(), "<p><strong>Hi</strong></p>");
//! assert_eq!(html2bbcode("<p><strong>Hi</strong></p>"), "[b]Hi[/b]");
//! ```
//!
//! Customizing either direction means building a [`Converter`] with a
//! different rule set, preset or sanitizer configuration.
#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub mod attrs;
pub mod css;
pub mod dom;
pub mod error;
pub mod escape;
pub mod node;
pub mod paragraph;
pub mod parse;
pub mod preset;
pub mod render;
pub mod rules;
pub mod sanitize;

pub use dom::{Element, Node};
pub use error::{Error, Result};
pub use node::{Attrs, ContentItem, TagNode};
pub use paragraph::{paragraph_aware_content, ParagraphOptions};
pub use preset::Preset;
pub use rules::{ProcessingRule, RuleSet};
pub use sanitize::SanitizerOptions;

/// Everything needed to convert in both directions.
pub struct Converter {
    rules: RuleSet,
    preset: Preset,
    sanitizer: SanitizerOptions,
}

impl Default for Converter {
    fn default() -> Self {
        Converter::new()
    }
}

impl Converter {
    /// Default rules, the CKEditor 5 preset and default sanitization.
    pub fn new() -> Self {
        Converter {
            rules: RuleSet::default(),
            preset: Preset::ckeditor5(),
            sanitizer: SanitizerOptions::default(),
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: SanitizerOptions) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    /// Convert a document to BBCode.
    ///
    /// Line breaks at either end of the document are dropped.
    pub fn html2bbcode(&self, nodes: &[Node]) -> String {
        self.rules.convert(nodes, None).trim_matches('\n').to_owned()
    }

    /// Convert a single element, `None` if no rule claims it.
    pub fn element2bbcode(&self, element: &Element) -> Option<String> {
        self.rules.element_to_bbcode(element)
    }

    /// Tokenize, sanitize and transform BBCode into an HTML element tree.
    ///
    /// Only tags the rule set can produce are recognized; the rest is text.
    pub fn bbcode2tree(&self, bbcode: &str) -> Result<Vec<ContentItem>> {
        let allowed = self.rules.allowed_tags();
        let tree = parse::parse(bbcode, &allowed);
        let tree = sanitize::sanitize(tree, &self.sanitizer);
        self.preset.transform(tree)
    }

    pub fn bbcode2html(&self, bbcode: &str) -> Result<String> {
        let tree = self.bbcode2tree(bbcode)?;
        render::to_html(&tree)
    }
}

/// Convert an HTML fragment to BBCode with the default [`Converter`].
pub fn html2bbcode(html: &str) -> String {
    Converter::new().html2bbcode(&dom::parse_html(html))
}

/// Convert BBCode to HTML with the default [`Converter`].
pub fn bbcode2html(bbcode: &str) -> Result<String> {
    Converter::new().bbcode2html(bbcode)
}

#[test]
fn converter_round_trip() {
    let converter = Converter::new();
    let html = converter.bbcode2html("[i]a[/i]\n\n[u]b[/u]").unwrap();
    assert_eq!(html, "<p><i>a</i></p><p><u>b</u></p>");
    assert_eq!(
        converter.html2bbcode(&dom::parse_html(&html)),
        "[i]a[/i]\n\n[u]b[/u]"
    );
}

#[test]
fn unknown_tags_stay_text() {
    assert_eq!(
        bbcode2html("[spoiler]x[/spoiler]").unwrap(),
        "<p>[spoiler]x[/spoiler]</p>"
    );
}

#[test]
fn custom_rules_narrow_the_whitelist() {
    let converter = Converter::new().with_rules(RuleSet::new(vec![Box::new(rules::BoldRule)]));
    assert_eq!(
        converter.bbcode2html("[b]x[/b] [i]y[/i]").unwrap(),
        "<p><strong>x</strong> [i]y[/i]</p>"
    );
}
