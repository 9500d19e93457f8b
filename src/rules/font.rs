//! Font color and size.

use super::{ElementView, ProcessingRule, Verdict};
use crate::css::{self, ColorMapper, SizeMapper};

/// `color` style to `[color=...]`.
///
/// The style is only consumed when the mapper produced a value.
#[derive(Clone, Copy)]
pub struct ColorRule {
    pub mapper: ColorMapper,
}

impl Default for ColorRule {
    fn default() -> Self {
        ColorRule {
            mapper: css::default_color_mapper,
        }
    }
}

impl ProcessingRule for ColorRule {
    fn id(&self) -> &str {
        "color"
    }

    fn tags(&self) -> &[&'static str] {
        &["color"]
    }

    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict {
        let mapped = element
            .style("color")
            .and_then(css::parse_color)
            .and_then(|c| (self.mapper)(&c));
        match mapped {
            Some(color) => {
                Verdict::matched(format!("[color={}]{}[/color]", color, content))
                    .consuming_style("color")
            }
            None => Verdict::abstain(),
        }
    }
}

/// `font-size` style to `[size=...]`.
#[derive(Clone, Copy)]
pub struct SizeRule {
    pub mapper: SizeMapper,
}

impl Default for SizeRule {
    fn default() -> Self {
        SizeRule {
            mapper: css::default_size_mapper,
        }
    }
}

impl ProcessingRule for SizeRule {
    fn id(&self) -> &str {
        "size"
    }

    fn tags(&self) -> &[&'static str] {
        &["size"]
    }

    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict {
        match element.style("font-size").and_then(self.mapper) {
            Some(size) => Verdict::matched(format!("[size={}]{}[/size]", size, content))
                .consuming_style("font-size"),
            None => Verdict::abstain(),
        }
    }
}
