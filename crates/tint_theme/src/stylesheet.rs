//! Flat stylesheet rule scanner
//!
//! Splits CSS text into `selector { declarations }` rules for hosts that
//! enumerate stylesheets from source text. At-rules (`@media`, `@font-face`,
//! `@keyframes`, `@import`, ...) are skipped whole, nested blocks included.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::multispace1,
    combinator::value,
    multi::many0,
    sequence::delimited,
    IResult,
};
use tracing::trace;

/// One style rule: selector text plus its raw declaration block
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    pub selector_text: String,
    pub declarations: String,
}

impl StyleRule {
    pub fn new(selector_text: impl Into<String>, declarations: impl Into<String>) -> Self {
        Self {
            selector_text: selector_text.into().trim().to_string(),
            declarations: declarations.into().trim().to_string(),
        }
    }

    /// `name: value` pairs in the declaration block, in source order
    pub fn declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        parse_declarations(&self.declarations)
    }

    /// Value of the last declaration of `property` in this rule
    pub fn property(&self, property: &str) -> Option<&str> {
        self.declarations()
            .filter(|(name, _)| *name == property)
            .map(|(_, value)| value)
            .last()
    }
}

/// Split a declaration block (`a: b; c: d`) into trimmed name/value pairs.
///
/// Semicolons inside parentheses or quotes do not end a declaration.
pub fn parse_declarations(block: &str) -> impl Iterator<Item = (&str, &str)> {
    split_top_level(block, ';').into_iter().filter_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        let name = name.trim();
        let value = value.trim();
        (!name.is_empty() && !value.is_empty()).then_some((name, value))
    })
}

fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Parse whitespace and comments
fn ws(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((value((), multispace1), value((), parse_comment)))),
    )(input)
}

/// Parse a block comment /* ... */
fn parse_comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("/*"), take_until("*/"), tag("*/"))(input)
}

/// Skip a balanced `{ ... }` block; `input` starts at `{`
fn skip_block(input: &str) -> &str {
    let mut depth = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &input[i + 1..];
                }
            }
            _ => {}
        }
    }
    ""
}

/// Skip an at-rule: up to `;` or through its balanced block
fn skip_at_rule(input: &str) -> &str {
    match input.find(['{', ';']) {
        Some(i) if input[i..].starts_with(';') => &input[i + 1..],
        Some(i) => skip_block(&input[i..]),
        None => "",
    }
}

fn style_rule(input: &str) -> IResult<&str, StyleRule> {
    let (input, selector) = take_while1(|c: char| c != '{' && c != '}')(input)?;
    let (input, _) = tag("{")(input)?;
    let (input, body) = take_while1::<_, _, nom::error::Error<&str>>(|c: char| c != '}')(input)
        .unwrap_or((input, ""));
    let (input, _) = tag("}")(input)?;
    Ok((input, StyleRule::new(selector, body)))
}

/// Scan `css` into its top-level style rules.
///
/// Unparseable fragments are skipped up to the next `}` so one bad rule does
/// not hide the rest of the sheet.
pub fn parse_rules(css: &str) -> Vec<StyleRule> {
    let mut rules = Vec::new();
    let mut rest = css;

    loop {
        rest = ws(rest).map_or(rest, |(r, _)| r);
        if rest.is_empty() {
            break;
        }
        if rest.starts_with('@') {
            rest = skip_at_rule(rest);
            continue;
        }
        match style_rule(rest) {
            Ok((after, rule)) => {
                if !rule.selector_text.is_empty() {
                    rules.push(rule);
                }
                rest = after;
            }
            Err(_) => {
                rest = rest.find('}').map_or("", |i| &rest[i + 1..]);
            }
        }
    }

    trace!(count = rules.len(), "scanned stylesheet rules");
    rules
}
