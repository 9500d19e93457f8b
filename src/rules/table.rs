//! Tables.
//!
//! Output is pretty-printed one row and one cell per line.

use super::{ElementView, ProcessingRule, Verdict};
use crate::dom::Node;

const SECTIONS: &[&str] = &["thead", "tbody", "tfoot"];

#[derive(Debug, Default, Clone, Copy)]
pub struct TableRule;

impl ProcessingRule for TableRule {
    fn id(&self) -> &str {
        "table"
    }

    fn tags(&self) -> &[&'static str] {
        &["table"]
    }

    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict {
        if element.name() != "table" {
            return Verdict::abstain();
        }
        Verdict::matched(format!("[table]\n{}\n[/table]\n", content.trim()))
    }
}

/// `<thead>`, `<tbody>` and `<tfoot>`.
///
/// A `<tbody>` that is its table's only section is implied and left out.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableSectionRule;

impl ProcessingRule for TableSectionRule {
    fn id(&self) -> &str {
        "table-section"
    }

    fn tags(&self) -> &[&'static str] {
        SECTIONS
    }

    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict {
        if !element.is(SECTIONS) {
            return Verdict::abstain();
        }

        let name = element.name();
        let lone_tbody = name == "tbody"
            && element.parent().map_or(false, |table| {
                table
                    .child_elements()
                    .filter(|c| SECTIONS.contains(&c.name.as_str()))
                    .count()
                    == 1
            });

        let mut out = if lone_tbody {
            content.trim().to_owned()
        } else {
            format!("[{0}]\n{1}\n[/{0}]", name, content.trim())
        };
        // Don't double a newline the following text already brings.
        let newline_follows = matches!(element.next_sibling(), Some(Node::Text(t)) if t.starts_with('\n'));
        if !newline_follows {
            out.push('\n');
        }
        Verdict::matched(out)
    }
}

/// `<tr>` to `[tr]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableRowRule;

impl ProcessingRule for TableRowRule {
    fn id(&self) -> &str {
        "table-row"
    }

    fn tags(&self) -> &[&'static str] {
        &["tr"]
    }

    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict {
        if element.name() != "tr" {
            return Verdict::abstain();
        }
        Verdict::matched(format!("[tr]\n{}\n[/tr]\n", content.trim()))
    }
}

/// `<td>` and `<th>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableCellRule;

impl ProcessingRule for TableCellRule {
    fn id(&self) -> &str {
        "table-cell"
    }

    fn tags(&self) -> &[&'static str] {
        &["td", "th"]
    }

    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict {
        if !element.is(&["td", "th"]) {
            return Verdict::abstain();
        }
        Verdict::matched(format!("[{0}]{1}[/{0}]\n", element.name(), content.trim()))
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::{parse_html, Element, Node};
    use crate::rules::RuleSet;

    fn convert(html: &str) -> String {
        RuleSet::default().convert(&parse_html(html), None)
    }

    #[test]
    fn lone_tbody_is_implied() {
        // The HTML parser inserts the <tbody>.
        assert_eq!(
            convert("<table><tr><td>a</td><td>b</td></tr></table>"),
            "[table]\n[tr]\n[td]a[/td]\n[td]b[/td]\n[/tr]\n[/table]\n"
        );
    }

    #[test]
    fn sections_kept_when_several() {
        assert_eq!(
            convert(
                "<table><thead><tr><th>h</th></tr></thead>\
                 <tbody><tr><td>a</td></tr></tbody></table>"
            ),
            "[table]\n[thead]\n[tr]\n[th]h[/th]\n[/tr]\n[/thead]\n\
             [tbody]\n[tr]\n[td]a[/td]\n[/tr]\n[/tbody]\n[/table]\n"
        );
    }

    #[test]
    fn no_double_newline_before_text() {
        let table = Element::new("table")
            .with_child(Element::new("thead").with_child("x"))
            .with_child("\n")
            .with_child(Element::new("tfoot").with_child("y"));
        let bbcode = RuleSet::default().convert(&[Node::Element(table)], None);
        assert_eq!(bbcode, "[table]\n[thead]\nx\n[/thead]\n[tfoot]\ny\n[/tfoot]\n[/table]\n");
    }
}
