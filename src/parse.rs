//! BBCode tokenizer.
//!
//! Turns BBCode text into a flat-per-level tag tree: text runs, line breaks
//! and nested [`TagNode`]s. Only whitelisted tags become nodes; anything else,
//! including malformed markup, stays plain text.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_till1, take_while1};
use nom::character::complete::{char, multispace0, multispace1};
use nom::combinator::opt;
use nom::multi::many0;
use nom::sequence::{delimited, preceded, separated_pair};
use nom::IResult;
use std::borrow::Cow;

use super::escape::OPEN_BRACKET_REF;
use super::node::{split_lines, ContentItem, TagNode};

/// Tag whose content is raw text up to its closing tag.
const CODE_TAG: &str = "code";
const LIST_TAG: &str = "list";
const LIST_ITEM_TAG: &str = "*";

/// Parse `input` into content items, keeping only tags named in `allowed`.
///
/// Tag names are matched without regard to ASCII case and stored lower-case.
pub fn parse(input: &str, allowed: &[&str]) -> Vec<ContentItem> {
    let mut tree = TreeBuilder::default();
    let mut input = input;
    while !input.is_empty() {
        let (rest, token) = next_token(input, allowed);
        tree.accept(token);
        input = rest;
    }
    tree.finish()
}

/// Escape every `[` of `text` that [`parse`] would read as the start of one
/// of the `allowed` tags. Other brackets are left as they are.
pub fn escape_tags<'t>(text: &'t str, allowed: &[&str]) -> Cow<'t, str> {
    let starts_tag =
        |idx: usize| text[idx..].starts_with('[') && tag_token(&text[idx..], allowed).is_some();
    if !text.char_indices().any(|(idx, _)| starts_tag(idx)) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for (idx, c) in text.char_indices() {
        if starts_tag(idx) {
            out.push_str(OPEN_BRACKET_REF);
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// An opening tag as written.
#[derive(PartialEq, Debug, Clone)]
struct OpenTag<'a> {
    name: &'a str,
    unique: Option<&'a str>,
    attrs: Vec<(&'a str, &'a str)>,
}

impl<'a> OpenTag<'a> {
    fn into_node(self) -> TagNode {
        let mut node = TagNode::new(self.name.to_ascii_lowercase());
        for (k, v) in self.attrs {
            node.attrs.insert(k.to_ascii_lowercase(), v.to_owned());
        }
        // Positional value goes last, keyed by itself.
        if let Some(unique) = self.unique {
            node.attrs.insert(unique.to_owned(), unique.to_owned());
        }
        node
    }
}

#[derive(PartialEq, Debug, Clone)]
enum Token<'a> {
    Text(&'a str),
    Eol,
    Open { tag: OpenTag<'a>, source: &'a str },
    Close { name: &'a str, source: &'a str },
    /// A context-free tag with its raw body.
    Raw { tag: OpenTag<'a>, body: &'a str },
}

fn is_allowed(name: &str, allowed: &[&str]) -> bool {
    allowed.iter().any(|a| a.eq_ignore_ascii_case(name))
}

fn next_token<'a>(input: &'a str, allowed: &[&str]) -> (&'a str, Token<'a>) {
    if let Some(rest) = input.strip_prefix("\r\n").or_else(|| input.strip_prefix('\n')) {
        return (rest, Token::Eol);
    }

    if input.starts_with('[') {
        if let Some(found) = tag_token(input, allowed) {
            return found;
        }
        // A bracket that does not start a known tag is just text.
        let (head, tail) = input.split_at(1);
        return (tail, Token::Text(head));
    }

    match text_run(input) {
        Ok((rest, text)) => (rest, Token::Text(text)),
        // Only a lone '\r' gets here.
        Err(_) => {
            let (head, tail) = input.split_at(1);
            (tail, Token::Text(head))
        }
    }
}

fn tag_token<'a>(input: &'a str, allowed: &[&str]) -> Option<(&'a str, Token<'a>)> {
    if let Ok((rest, name)) = close_tag(input) {
        if !is_allowed(name, allowed) {
            debug!("not a known tag: [/{}]", name);
            return None;
        }
        let source = &input[..input.len() - rest.len()];
        return Some((rest, Token::Close { name, source }));
    }

    let (rest, open) = open_tag(input).ok()?;
    if !is_allowed(open.name, allowed) {
        debug!("not a known tag: [{}]", open.name);
        return None;
    }
    let source = &input[..input.len() - rest.len()];

    if open.name.eq_ignore_ascii_case(CODE_TAG) {
        let end = find_no_case(rest, "[/code]")?;
        let (body, tail) = rest.split_at(end);
        return Some((&tail["[/code]".len()..], Token::Raw { tag: open, body }));
    }

    Some((rest, Token::Open { tag: open, source }))
}

/// Byte offset of the first case-insensitive occurrence of `needle`.
fn find_no_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack.char_indices().map(|(idx, _)| idx).find(|&idx| {
        haystack[idx..]
            .get(..needle.len())
            .map_or(false, |s| s.eq_ignore_ascii_case(needle))
    })
}

fn text_run(input: &str) -> IResult<&str, &str> {
    take_till1(|c| c == '[' || c == '\n' || c == '\r')(input)
}

fn tag_name(input: &str) -> IResult<&str, &str> {
    alt((tag(LIST_ITEM_TAG), take_while1(|c: char| c.is_ascii_alphanumeric())))(input)
}

fn attr_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_')(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c| c == '"' || c == '\n'), char('"'))(input)
}

fn unquoted(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == ']' || c == '"' || c.is_whitespace())(input)
}

fn value(input: &str) -> IResult<&str, &str> {
    alt((quoted, unquoted))(input)
}

fn named_attr(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(multispace1, separated_pair(attr_name, char('='), value))(input)
}

/// Recognizes `[name]`, `[name=value]` and `[name attr=value ...]`.
fn open_tag(input: &str) -> IResult<&str, OpenTag> {
    let (input, _) = char('[')(input)?;
    let (input, name) = tag_name(input)?;
    let (input, unique) = opt(preceded(char('='), value))(input)?;
    let (input, attrs) = many0(named_attr)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(']')(input)?;
    Ok((input, OpenTag { name, unique, attrs }))
}

/// Recognizes `[/name]`.
fn close_tag(input: &str) -> IResult<&str, &str> {
    delimited(tag("[/"), tag_name, char(']'))(input)
}

/// An open tag waiting for its close.
struct Frame {
    node: TagNode,
    /// Literal text to restore if the tag is never closed.
    source: String,
}

/// Assembles tokens into a tree with a stack of open tags.
#[derive(Default)]
struct TreeBuilder {
    root: Vec<ContentItem>,
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn push(&mut self, item: ContentItem) {
        match self.stack.last_mut() {
            Some(frame) => frame.node.push(item),
            None => {
                if let (Some(ContentItem::Text(last)), ContentItem::Text(s)) =
                    (self.root.last_mut(), &item)
                {
                    last.push_str(s);
                    return;
                }
                self.root.push(item);
            }
        }
    }

    fn nearest(&self, tag: &str) -> Option<usize> {
        self.stack.iter().rposition(|f| f.node.tag == tag)
    }

    fn accept(&mut self, token: Token) {
        match token {
            Token::Text(s) => self.push(ContentItem::text(s)),
            Token::Eol => self.push(ContentItem::Eol),
            Token::Raw { tag, body } => {
                let mut node = tag.into_node();
                for item in split_lines(body) {
                    node.push(item);
                }
                self.push(node.into());
            }
            Token::Open { tag, source } => {
                let node = tag.into_node();
                if node.tag == LIST_ITEM_TAG {
                    // An item runs until the next item or the end of its list.
                    match self.nearest(LIST_TAG) {
                        Some(list) => self.close_above(list),
                        None => {
                            self.push(ContentItem::text(source));
                            return;
                        }
                    }
                }
                self.stack.push(Frame {
                    node,
                    source: source.to_owned(),
                });
            }
            Token::Close { name, source } => {
                let name = name.to_ascii_lowercase();
                match self.nearest(&name) {
                    Some(idx) => {
                        self.close_above(idx);
                        self.close_top();
                    }
                    None => {
                        debug!("unmatched closing tag {}", source);
                        self.push(ContentItem::text(source));
                    }
                }
            }
        }
    }

    /// Close everything stacked above `idx`. List items close normally,
    /// anything else was never closed and is dissolved.
    fn close_above(&mut self, idx: usize) {
        while self.stack.len() > idx + 1 {
            let is_item = self
                .stack
                .last()
                .map_or(false, |f| f.node.tag == LIST_ITEM_TAG);
            if is_item {
                self.close_top();
            } else {
                self.dissolve_top();
            }
        }
    }

    fn close_top(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.push(frame.node.into());
        }
    }

    /// Turn an unclosed tag back into text, keeping its children in place.
    fn dissolve_top(&mut self) {
        if let Some(mut frame) = self.stack.pop() {
            debug!("unclosed tag {}", frame.source);
            self.push(ContentItem::Text(frame.source));
            for item in frame.node.take_content() {
                self.push_dissolved(item);
            }
        }
    }

    /// Items orphaned from a dissolved list lose their meaning too.
    fn push_dissolved(&mut self, item: ContentItem) {
        match item {
            ContentItem::Node(mut node) if node.tag == LIST_ITEM_TAG => {
                self.push(ContentItem::text("[*]"));
                for child in node.take_content() {
                    self.push(child);
                }
            }
            other => self.push(other),
        }
    }

    fn finish(mut self) -> Vec<ContentItem> {
        while !self.stack.is_empty() {
            self.dissolve_top();
        }
        self.root
    }
}
