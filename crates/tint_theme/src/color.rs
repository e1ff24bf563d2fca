//! Color codec
//!
//! The canonical theme sheet stores colors as space-separated decimal
//! channels (`"255 128 64"`) so they compose as `rgb(var(--oui-color-x))`.
//! Editors work in hex. This module converts between the two.
//!
//! ```rust
//! use tint_theme::color::{hex_to_rgb_triple, rgb_triple_to_hex};
//!
//! assert_eq!(hex_to_rgb_triple("#ff8040").as_deref(), Some("255 128 64"));
//! assert_eq!(rgb_triple_to_hex("255 128 64"), "#ff8040");
//! assert_eq!(rgb_triple_to_hex("not a color"), "");
//! ```

use std::fmt;

use nom::{
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map_res, opt},
    sequence::preceded,
    IResult,
};

/// An opaque 8-bit RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb` (case-insensitive)
    pub fn from_hex(hex: &str) -> Option<Self> {
        parse_hex(hex.trim()).ok().map(|(_, rgb)| rgb)
    }

    /// Parse a space-separated channel triple such as `"255 128 64"`
    ///
    /// Exactly three integer tokens in `0..=255` are required.
    pub fn from_triple(triple: &str) -> Option<Self> {
        let mut tokens = triple.split_whitespace();
        let r = tokens.next()?.parse::<u8>().ok()?;
        let g = tokens.next()?.parse::<u8>().ok()?;
        let b = tokens.next()?.parse::<u8>().ok()?;
        if tokens.next().is_some() {
            return None;
        }
        Some(Self::new(r, g, b))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Space-separated decimal channels
    pub fn to_triple(self) -> String {
        format!("{} {} {}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Convert a hex color to an `R G B` channel triple.
///
/// Returns `None` when `hex` is not a 3- or 6-digit hex color.
pub fn hex_to_rgb_triple(hex: &str) -> Option<String> {
    Rgb::from_hex(hex).map(Rgb::to_triple)
}

/// Convert an `R G B` channel triple to lowercase `#rrggbb`.
///
/// Returns an empty string when the input is not exactly three channels in
/// `0..=255`. Callers treat the empty string as "no valid color".
pub fn rgb_triple_to_hex(rgb: &str) -> String {
    Rgb::from_triple(rgb).map(Rgb::to_hex).unwrap_or_default()
}

fn hex_pair(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |s: &str| u8::from_str_radix(s, 16),
    )(input)
}

fn hex_nibble(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(1, 1, |c: char| c.is_ascii_hexdigit()),
        |s: &str| u8::from_str_radix(s, 16).map(|v| v * 17),
    )(input)
}

fn long_hex(input: &str) -> IResult<&str, Rgb> {
    let (input, r) = hex_pair(input)?;
    let (input, g) = hex_pair(input)?;
    let (input, b) = hex_pair(input)?;
    Ok((input, Rgb::new(r, g, b)))
}

fn short_hex(input: &str) -> IResult<&str, Rgb> {
    let (input, r) = hex_nibble(input)?;
    let (input, g) = hex_nibble(input)?;
    let (input, b) = hex_nibble(input)?;
    Ok((input, Rgb::new(r, g, b)))
}

/// Parse hex color: #RGB or #RRGGBB, with the `#` optional
fn parse_hex(input: &str) -> IResult<&str, Rgb> {
    all_consuming(preceded(opt(char('#')), long_hex))(input)
        .or_else(|_| all_consuming(preceded(opt(char('#')), short_hex))(input))
}
