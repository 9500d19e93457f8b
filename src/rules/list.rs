//! Lists.
//!
//! CSS `list-style-type` is not consulted; the ordered list type comes from
//! the `type` attribute only.

use super::{ElementView, ProcessingRule, Verdict};

/// `<ul>` to `[list]`, `<ol type="...">` to `[list=...]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListRule;

impl ProcessingRule for ListRule {
    fn id(&self) -> &str {
        "list"
    }

    fn tags(&self) -> &[&'static str] {
        &["list"]
    }

    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict {
        let open = match element.name() {
            "ul" => "[list]".to_owned(),
            "ol" => {
                let kind = element
                    .attr("type")
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or("1");
                format!("[list={}]", kind)
            }
            _ => return Verdict::abstain(),
        };
        Verdict::matched(format!("{}\n{}\n[/list]\n", open, content.trim()))
    }
}

/// `<li>` to `[*]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListItemRule;

impl ProcessingRule for ListItemRule {
    fn id(&self) -> &str {
        "list-item"
    }

    fn tags(&self) -> &[&'static str] {
        &["*"]
    }

    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict {
        if element.name() != "li" {
            return Verdict::abstain();
        }
        Verdict::matched(format!("[*] {}\n", content.trim()))
    }
}
