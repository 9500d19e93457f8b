//! CSS color and font size values, and their mapping to BBCode arguments.

use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while_m_n};
use nom::character::complete::{alpha1, char, multispace0};
use nom::combinator::{all_consuming, map, map_opt, opt, verify};
use nom::number::complete::double;
use nom::sequence::{delimited, preceded, terminated, tuple};
use nom::IResult;
use palette::Srgb;

/// A color value as found in a `color` style property or `[color=...]`.
#[derive(PartialEq, Debug, Clone)]
pub enum CssColor {
    /// A CSS named color, lower-case.
    Named(String),
    Rgb(Srgb<u8>),
}

impl CssColor {
    /// `#rrggbb` for RGB values, the name otherwise.
    pub fn to_css(&self) -> String {
        match self {
            CssColor::Named(name) => name.clone(),
            CssColor::Rgb(c) => format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue),
        }
    }
}

/// Maps a color to the `[color=...]` argument. `None` abstains.
pub type ColorMapper = fn(&CssColor) -> Option<String>;

/// Maps a `font-size` value to the `[size=...]` argument. `None` abstains.
pub type SizeMapper = fn(&str) -> Option<String>;

pub fn default_color_mapper(color: &CssColor) -> Option<String> {
    Some(color.to_css())
}

/// Accepts `12px`, `12pt` and bare numbers, rounded to an integer.
pub fn default_size_mapper(size: &str) -> Option<String> {
    parse_font_size(size).map(|n| n.to_string())
}

/// Parse a color in any of the forms `#rgb`, `#rrggbb`, `rgb(r, g, b)` or a
/// CSS color name.
pub fn parse_color(value: &str) -> Option<CssColor> {
    all_consuming(delimited(
        multispace0,
        alt((hex_color, rgb_function, css_color)),
        multispace0,
    ))(value)
    .ok()
    .map(|(_, c)| c)
}

/// Parse a font size into whole pixels (or points, or unitless).
pub fn parse_font_size(value: &str) -> Option<u32> {
    let unit = opt(alt((tag_no_case("px"), tag_no_case("pt"))));
    let parsed: IResult<&str, f64> = all_consuming(delimited(
        multispace0,
        terminated(verify(double, |n: &f64| n.is_finite() && *n > 0.0), unit),
        multispace0,
    ))(value);
    parsed.ok().map(|(_, n)| n.round() as u32)
}

fn hex_digits(input: &str) -> IResult<&str, &str> {
    verify(
        take_while_m_n(3, 6, |c: char| c.is_ascii_hexdigit()),
        |d: &str| d.len() == 3 || d.len() == 6,
    )(input)
}

fn hex_color(input: &str) -> IResult<&str, CssColor> {
    map_opt(preceded(char('#'), hex_digits), |digits: &str| {
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        let (r, g, b) = if digits.len() == 3 {
            // #abc is #aabbcc
            (
                channel(&digits[0..1])? * 17,
                channel(&digits[1..2])? * 17,
                channel(&digits[2..3])? * 17,
            )
        } else {
            (
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )
        };
        Some(CssColor::Rgb(Srgb::new(r, g, b)))
    })(input)
}

fn rgb_function(input: &str) -> IResult<&str, CssColor> {
    let channel = || delimited(multispace0, nom::character::complete::u8, multispace0);
    map(
        delimited(
            tag_no_case("rgb("),
            tuple((channel(), tag(","), channel(), tag(","), channel())),
            char(')'),
        ),
        |(r, _, g, _, b)| CssColor::Rgb(Srgb::new(r, g, b)),
    )(input)
}

fn css_color(input: &str) -> IResult<&str, CssColor> {
    map(
        verify(alpha1, |name: &str| {
            palette::named::from_str(&name.to_ascii_lowercase()).is_some()
        }),
        |name: &str| CssColor::Named(name.to_ascii_lowercase()),
    )(input)
}
