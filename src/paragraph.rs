//! Implicit paragraphs.
//!
//! BBCode has no paragraph tag: a paragraph break is two or more line breaks
//! in a row. [`paragraph_aware_content`] takes one node's flat content and
//! decides where `p` wrappers go, without ever wrapping block content and
//! without emitting paragraphs that hold nothing.
//!
//! Runs of line breaks below the threshold are squashed to a single break.
//! This keeps repeated BBCode -> HTML -> BBCode trips from accumulating blank
//! lines.

use std::mem;

use super::node::{ContentItem, TagNode};

/// Tag of the generated wrapper nodes.
pub const PARAGRAPH_TAG: &str = "p";

/// Tags that are never wrapped in a paragraph unless configured otherwise.
pub const DEFAULT_BLOCK_TAGS: &[&str] = &["quote", "table", "list"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphOptions {
    /// Wrap everything, even inline content with no blank line in it.
    pub require_paragraph: bool,
    /// Number of consecutive line breaks that separate paragraphs.
    pub newline_threshold: usize,
    /// Raw BBCode tag names that are block content.
    pub block_tags: Vec<String>,
}

impl Default for ParagraphOptions {
    fn default() -> Self {
        ParagraphOptions {
            require_paragraph: false,
            newline_threshold: 2,
            block_tags: DEFAULT_BLOCK_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl ParagraphOptions {
    pub fn with_require_paragraph(mut self, require: bool) -> Self {
        self.require_paragraph = require;
        self
    }

    pub fn with_newline_threshold(mut self, threshold: usize) -> Self {
        self.newline_threshold = threshold;
        self
    }

    pub fn with_block_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.block_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_block(&self, tag: &str) -> bool {
        self.block_tags.iter().any(|t| t == tag)
    }

    /// Break runs of at least this length end a paragraph. Never zero.
    fn threshold(&self) -> usize {
        self.newline_threshold.max(1)
    }
}

/// Wrap `content` into paragraphs where its line breaks call for them.
///
/// Single left-to-right pass over the content.
pub fn paragraph_aware_content(
    content: Vec<ContentItem>,
    options: &ParagraphOptions,
) -> Vec<ContentItem> {
    content
        .into_iter()
        .fold(Paragraphs::new(options), Paragraphs::feed)
        .finish()
}

/// Fold state.
struct Paragraphs<'o> {
    options: &'o ParagraphOptions,
    /// Flips to true once any paragraph exists so siblings stay consistent.
    require: bool,
    /// Inline content not yet committed.
    buffer: Vec<ContentItem>,
    /// Length of the current run of line breaks.
    newlines: usize,
    result: Vec<ContentItem>,
}

impl<'o> Paragraphs<'o> {
    fn new(options: &'o ParagraphOptions) -> Self {
        Paragraphs {
            options,
            require: options.require_paragraph,
            buffer: Vec::new(),
            newlines: 0,
            result: Vec::new(),
        }
    }

    fn feed(mut self, item: ContentItem) -> Self {
        match item {
            ContentItem::Eol => self.newlines += 1,
            ContentItem::Node(node) if self.options.is_block(&node.tag) => {
                // A mandated paragraph is not lost just because a block
                // comes first.
                if !self.buffer.is_empty()
                    || (self.options.require_paragraph && self.result.is_empty())
                {
                    self.commit_paragraph();
                }
                self.newlines = 0;
                self.result.push(ContentItem::Node(node));
            }
            inline => {
                self.settle_newlines();
                self.buffer.push(inline);
            }
        }
        self
    }

    /// Resolve a pending run of line breaks before an inline item.
    fn settle_newlines(&mut self) {
        let run = mem::take(&mut self.newlines);
        if run == 0 {
            return;
        }

        if run < self.options.threshold() {
            self.buffer.push(ContentItem::Eol);
        } else if self.result.is_empty() && self.buffer.is_empty() {
            // Leading breaks never start a paragraph.
            self.buffer.push(ContentItem::Eol);
        } else {
            if !self.buffer.is_empty() {
                self.commit_paragraph();
            }
            self.require = true;
        }
    }

    fn commit_paragraph(&mut self) {
        let content = mem::take(&mut self.buffer);
        self.result
            .push(TagNode::new(PARAGRAPH_TAG).with_content(content).into());
        self.require = true;
    }

    fn finish(mut self) -> Vec<ContentItem> {
        if self.require {
            // Trailing breaks are insignificant here.
            if !self.buffer.is_empty() {
                self.commit_paragraph();
            } else if self.result.is_empty() && self.options.require_paragraph {
                self.commit_paragraph();
            }
        } else {
            self.result.append(&mut self.buffer);
            if self.newlines > 0 {
                self.result.push(ContentItem::Eol);
            }
        }
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ContentItem::Eol;

    fn p(content: Vec<ContentItem>) -> ContentItem {
        TagNode::new(PARAGRAPH_TAG).with_content(content).into()
    }

    fn quote(content: Vec<ContentItem>) -> ContentItem {
        TagNode::new("quote").with_content(content).into()
    }

    fn t(s: &str) -> ContentItem {
        ContentItem::text(s)
    }

    fn run(content: Vec<ContentItem>) -> Vec<ContentItem> {
        paragraph_aware_content(content, &ParagraphOptions::default())
    }

    fn run_required(content: Vec<ContentItem>) -> Vec<ContentItem> {
        paragraph_aware_content(
            content,
            &ParagraphOptions::default().with_require_paragraph(true),
        )
    }

    /// Undo paragraphs: join adjacent ones with a paragraph break.
    fn flatten(content: Vec<ContentItem>) -> Vec<ContentItem> {
        let mut out = Vec::new();
        let mut after_paragraph = false;
        for item in content {
            match item {
                ContentItem::Node(mut node) if node.tag == PARAGRAPH_TAG => {
                    if after_paragraph {
                        out.extend([Eol, Eol]);
                    }
                    out.extend(node.take_content());
                    after_paragraph = true;
                }
                other => {
                    out.push(other);
                    after_paragraph = false;
                }
            }
        }
        out
    }

    #[test]
    fn empty() {
        assert_eq!(run(vec![]), vec![]);
    }

    #[test]
    fn empty_required_yields_one_paragraph() {
        assert_eq!(run_required(vec![]), vec![p(vec![])]);
    }

    #[test]
    fn lone_newlines_squash() {
        assert_eq!(run(vec![Eol]), vec![Eol]);
        assert_eq!(run(vec![Eol, Eol]), vec![Eol]);
        assert_eq!(run(vec![Eol, Eol, Eol]), vec![Eol]);
    }

    #[test]
    fn plain_text_unwrapped() {
        assert_eq!(run(vec![t("lorem")]), vec![t("lorem")]);
    }

    #[test]
    fn plain_text_required() {
        assert_eq!(run_required(vec![t("lorem")]), vec![p(vec![t("lorem")])]);
    }

    #[test]
    fn threshold_splits_paragraphs() {
        assert_eq!(
            run(vec![t("lorem"), Eol, Eol, t("dolor")]),
            vec![p(vec![t("lorem")]), p(vec![t("dolor")])]
        );
    }

    #[test]
    fn long_break_run_is_one_split() {
        assert_eq!(
            run(vec![t("lorem"), Eol, Eol, Eol, Eol, t("dolor")]),
            vec![p(vec![t("lorem")]), p(vec![t("dolor")])]
        );
    }

    #[test]
    fn single_break_stays_inline() {
        assert_eq!(
            run(vec![t("lorem"), Eol, t("dolor")]),
            vec![t("lorem"), Eol, t("dolor")]
        );
    }

    #[test]
    fn higher_threshold_squashes_short_runs() {
        let options = ParagraphOptions::default().with_newline_threshold(3);
        assert_eq!(
            paragraph_aware_content(vec![t("a"), Eol, Eol, t("b")], &options),
            vec![t("a"), Eol, t("b")]
        );
        assert_eq!(
            paragraph_aware_content(vec![t("a"), Eol, Eol, Eol, t("b")], &options),
            vec![p(vec![t("a")]), p(vec![t("b")])]
        );
    }

    #[test]
    fn leading_breaks_do_not_split() {
        assert_eq!(
            run(vec![Eol, Eol, Eol, t("lorem")]),
            vec![Eol, t("lorem")]
        );
    }

    #[test]
    fn trailing_breaks_squash_when_unwrapped() {
        assert_eq!(
            run(vec![t("lorem"), Eol, Eol, Eol]),
            vec![t("lorem"), Eol]
        );
    }

    #[test]
    fn trailing_breaks_dropped_in_paragraph_mode() {
        assert_eq!(
            run(vec![t("a"), Eol, Eol, t("b"), Eol, Eol]),
            vec![p(vec![t("a")]), p(vec![t("b")])]
        );
    }

    #[test]
    fn block_between_text() {
        let q = quote(vec![t("ipsum")]);
        assert_eq!(
            run(vec![t("lorem"), q.clone(), t("dolor")]),
            vec![p(vec![t("lorem")]), q, p(vec![t("dolor")])]
        );
    }

    #[test]
    fn adjacent_blocks_stay_unwrapped() {
        let q = quote(vec![]);
        let list = TagNode::new("list").into();
        assert_eq!(
            run(vec![q.clone(), Eol, list]),
            vec![q, TagNode::new("list").into()]
        );
    }

    #[test]
    fn block_first_when_required_keeps_mandated_paragraph() {
        let q = quote(vec![]);
        assert_eq!(run_required(vec![q.clone()]), vec![p(vec![]), q]);
    }

    #[test]
    fn block_first_when_not_required() {
        let q = quote(vec![]);
        assert_eq!(run(vec![q.clone(), t("x")]), vec![q, t("x")]);
    }

    #[test]
    fn inline_nodes_are_buffered() {
        let b: ContentItem = TagNode::new("b").with_content(vec![t("x")]).into();
        assert_eq!(
            run(vec![b.clone(), Eol, Eol, t("y")]),
            vec![p(vec![b]), p(vec![t("y")])]
        );
    }

    #[test]
    fn configured_block_tags() {
        let options = ParagraphOptions::default().with_block_tags(["code"]);
        let code: ContentItem = TagNode::new("code").into();
        let q = quote(vec![]);
        assert_eq!(
            paragraph_aware_content(vec![t("a"), code.clone(), q.clone()], &options),
            vec![p(vec![t("a")]), code, p(vec![q])]
        );
    }

    #[test]
    fn second_pass_adds_no_splits() {
        let inputs = vec![
            vec![t("lorem"), Eol, Eol, t("dolor")],
            vec![t("a"), Eol, t("b"), Eol, Eol, Eol, t("c")],
            vec![Eol, Eol, t("a"), Eol],
            vec![t("a"), quote(vec![t("b")]), Eol, t("c")],
        ];
        for input in inputs {
            let once = run(input);
            let twice = run(flatten(once.clone()));
            assert_eq!(once, twice);
        }
    }
}
