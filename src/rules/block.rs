//! Paragraphs and block quotes.
//!
//! A paragraph has no tag of its own: it is its content followed by a blank
//! line, which the BBCode -> HTML direction reads back as a paragraph break.

use super::{ElementView, ProcessingRule, Verdict};

#[derive(Debug, Default, Clone, Copy)]
pub struct ParagraphRule;

impl ProcessingRule for ParagraphRule {
    fn id(&self) -> &str {
        "paragraph"
    }

    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict {
        if element.name() != "p" {
            return Verdict::abstain();
        }
        Verdict::matched(format!("{}\n\n", content.trim()))
    }
}

/// `<blockquote>` to `[quote]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuoteRule;

impl ProcessingRule for QuoteRule {
    fn id(&self) -> &str {
        "quote"
    }

    fn tags(&self) -> &[&'static str] {
        &["quote"]
    }

    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict {
        if element.name() != "blockquote" {
            return Verdict::abstain();
        }
        Verdict::matched(format!("[quote]\n{}\n[/quote]\n", content.trim()))
    }
}
