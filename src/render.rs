//! HTML serialization of a transformed tag tree.

use super::node::{ContentItem, TagNode};

pub type Result<E> = std::result::Result<(), E>;

pub trait Renderer {
    type Err;

    fn render(&mut self, content: &[ContentItem]) -> Result<Self::Err> {
        for item in content {
            match item {
                ContentItem::Text(s) => self.text(s)?,
                ContentItem::Eol => self.eol()?,
                ContentItem::Node(node) => match &node.content {
                    Some(children) => {
                        self.open(node)?;
                        self.render(children)?;
                        self.close(node)?
                    }
                    None => self.void(node)?,
                },
            }
        }

        Ok(())
    }

    /// Output some text. It has been escaped already, if it needs to be.
    fn text(&mut self, s: &str) -> Result<Self::Err>;
    /// Output a line break.
    fn eol(&mut self) -> Result<Self::Err>;
    /// Output the start tag of a container.
    fn open(&mut self, node: &TagNode) -> Result<Self::Err>;
    /// Output the end tag of a container.
    fn close(&mut self, node: &TagNode) -> Result<Self::Err>;
    /// Output an element that has no content.
    fn void(&mut self, node: &TagNode) -> Result<Self::Err>;
}

pub struct SimpleHtml<O>
where
    O: std::io::Write,
{
    out: O,
}

impl<O: std::io::Write> SimpleHtml<O> {
    pub fn new(out: O) -> Self {
        Self { out }
    }

    /// Write s to output, replacing each character in escapes with the corresponding
    /// index of replacements.
    ///
    /// Each escaped character must be one UTF-8 byte (for simplicity) and the
    /// two slices must be the same length.
    fn write_escaped(
        &mut self,
        mut s: &str,
        escapes: &[char],
        replacements: &[&'static str],
    ) -> IoResult<()> {
        debug_assert_eq!(escapes.len(), replacements.len());
        debug_assert!(escapes.iter().all(|c| c.len_utf8() == 1));

        while let Some(split) = s.find(escapes) {
            let (head, tail) = s.split_at(split);
            // tail is inclusive of the split point and all of the matched
            // chars are one byte in UTF-8, so taking the first byte here
            // is safe (and easier than pulling out the first char).
            let victim = tail.as_bytes()[0] as char;
            let repl = escapes
                .iter()
                .position(|&c| c == victim)
                .map_or("", |i| replacements[i]);

            write!(self.out, "{}{}", head, repl)?;
            s = &tail[1..];
        }

        // Write remaining data past all replaced entities
        write!(self.out, "{}", s)
    }

    fn start_tag(&mut self, node: &TagNode) -> IoResult<()> {
        write!(self.out, "<{}", node.tag)?;
        for (name, value) in &node.attrs {
            write!(self.out, " {}=\"", name)?;
            self.write_escaped(
                value,
                &['&', '<', '>', '"'],
                &["&amp;", "&lt;", "&gt;", "&quot;"],
            )?;
            write!(self.out, "\"")?;
        }
        write!(self.out, ">")
    }

    pub fn into_inner(self) -> O {
        self.out
    }
}

use std::io::Result as IoResult;

impl<O: std::io::Write> Renderer for SimpleHtml<O> {
    type Err = std::io::Error;

    fn text(&mut self, s: &str) -> IoResult<()> {
        write!(self.out, "{}", s)
    }

    fn eol(&mut self) -> IoResult<()> {
        writeln!(self.out)
    }

    fn open(&mut self, node: &TagNode) -> IoResult<()> {
        self.start_tag(node)
    }

    fn close(&mut self, node: &TagNode) -> IoResult<()> {
        write!(self.out, "</{}>", node.tag)
    }

    fn void(&mut self, node: &TagNode) -> IoResult<()> {
        self.start_tag(node)
    }
}

/// Render `content` to an HTML string.
pub fn to_html(content: &[ContentItem]) -> crate::error::Result<String> {
    let mut renderer = SimpleHtml::new(Vec::new());
    renderer.render(content)?;
    Ok(String::from_utf8(renderer.into_inner())?)
}
