//! Headings.

use nom::character::complete::{char, one_of};
use nom::combinator::all_consuming;
use nom::sequence::preceded;
use nom::IResult;

use super::{ElementView, ProcessingRule, Verdict};

/// `<h1>`..`<h6>` to `[h1]`..`[h6]`, followed by a paragraph break.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadingRule;

/// Heading level of an element name, `h1` to `h6`.
fn heading_level(name: &str) -> IResult<&str, char> {
    all_consuming(preceded(char('h'), one_of("123456")))(name)
}

impl ProcessingRule for HeadingRule {
    fn id(&self) -> &str {
        "heading"
    }

    fn tags(&self) -> &[&'static str] {
        &["h1", "h2", "h3", "h4", "h5", "h6"]
    }

    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict {
        match heading_level(element.name()) {
            Ok((_, level)) => Verdict::matched(format!(
                "[h{0}]{1}[/h{0}]\n\n",
                level,
                content.trim()
            )),
            Err(_) => Verdict::abstain(),
        }
    }
}

#[test]
fn heading_levels() {
    assert_eq!(heading_level("h3"), Ok(("", '3')));
    assert!(heading_level("h7").is_err());
    assert!(heading_level("h12").is_err());
    assert!(heading_level("header").is_err());
}

#[test]
fn heading_trims_content() {
    use crate::dom::Element;
    use crate::rules::{Consumed, RuleResult};

    let h2 = Element::new("h2");
    let consumed = Consumed::default();
    let verdict = HeadingRule.to_data(&ElementView::new(&h2, &consumed), " Title \n");
    assert_eq!(verdict.result, RuleResult::Matched("[h2]Title[/h2]\n\n".into()));
}
