//! Minimal CSS selector engine
//!
//! Gives [`StyleTree`] hosts without a native selector engine a default
//! `matches` implementation, and lets the resolver retry override selectors
//! that were authored against an interaction state.
//!
//! # Supported Syntax
//!
//! - Selector lists: `a, b`
//! - Simple selectors: `*`, `div`, `#id`, `.class`, `[attr]`, `[attr=value]`
//!   (plus `~=`, `|=`, `^=`, `$=`, `*=`)
//! - Combinators: descendant (whitespace), `>`, `+`, `~`
//! - Structural pseudo-classes: `:first-child`, `:last-child`, `:only-child`,
//!   `:nth-child(An+B)`, `:nth-last-child(An+B)`, `:first-of-type`,
//!   `:last-of-type`, `:nth-of-type(An+B)`, `:root`, `:empty`
//! - Attribute-backed pseudo-classes: `:disabled`, `:enabled`, `:checked`
//! - Logical pseudo-classes over compound selectors: `:not()`, `:is()`, `:where()`
//! - Pseudo-elements (`::before`, legacy `:after`), which match their
//!   originating element
//!
//! Interaction-state pseudo-classes (`:hover`, `:focus`, ...) cannot be
//! evaluated against a static tree and fail with
//! [`SelectorError::StatefulPseudoClass`]. [`strip_pseudo_classes`] removes
//! them so the selector can be retried.

use std::fmt;

use nom::{
    bytes::complete::{take_till, take_while1},
    character::complete::{char, multispace0, one_of},
    combinator::opt,
    IResult,
};
use smallvec::SmallVec;

use crate::dom::StyleTree;
use crate::error::SelectorError;

/// Pseudo-classes tied to user interaction or navigation state
pub const STATEFUL_PSEUDO_CLASSES: &[&str] = &[
    "hover",
    "focus",
    "active",
    "focus-visible",
    "focus-within",
    "visited",
    "link",
    "any-link",
    "target",
    "focus-ring",
];

const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Selector specificity as (ids, classes, types)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl std::ops::Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

/// Attribute comparison operators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrOp {
    /// `=`
    Equals,
    /// `~=`
    Includes,
    /// `|=`
    DashMatch,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

impl AttrOp {
    fn test(self, actual: &str, expected: &str) -> bool {
        match self {
            AttrOp::Equals => actual == expected,
            AttrOp::Includes => actual.split_whitespace().any(|w| w == expected),
            AttrOp::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttrOp::Prefix => !expected.is_empty() && actual.starts_with(expected),
            AttrOp::Suffix => !expected.is_empty() && actual.ends_with(expected),
            AttrOp::Substring => !expected.is_empty() && actual.contains(expected),
        }
    }
}

/// `An+B` index pattern used by the `nth-*` pseudo-classes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nth {
    pub a: i32,
    pub b: i32,
}

impl Nth {
    pub fn parse(input: &str) -> Option<Self> {
        let compact: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "odd" => return Some(Self { a: 2, b: 1 }),
            "even" => return Some(Self { a: 2, b: 0 }),
            _ => {}
        }
        match compact.split_once('n') {
            Some((a, b)) => {
                let a = match a {
                    "" | "+" => 1,
                    "-" => -1,
                    other => other.parse().ok()?,
                };
                let b = if b.is_empty() { 0 } else { b.parse().ok()? };
                Some(Self { a, b })
            }
            None => compact.parse().ok().map(|b| Self { a: 0, b }),
        }
    }

    /// Test a 1-based position
    pub fn matches(self, index: i32) -> bool {
        if self.a == 0 {
            return index == self.b;
        }
        // Widened so `a` and `b` taken from arbitrary selector text cannot overflow
        let (a, diff) = (i64::from(self.a), i64::from(index) - i64::from(self.b));
        diff % a == 0 && diff / a >= 0
    }
}

/// Pseudo-classes that can be evaluated statically
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    NthChild(Nth),
    NthLastChild(Nth),
    FirstOfType,
    LastOfType,
    NthOfType(Nth),
    Root,
    Empty,
    Disabled,
    Enabled,
    Checked,
    Not(Vec<CompoundSelector>),
    Is(Vec<CompoundSelector>),
    Where(Vec<CompoundSelector>),
}

/// A single simple selector
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Type(String),
    Id(String),
    Class(String),
    Attribute {
        name: String,
        op: Option<(AttrOp, String)>,
    },
    Pseudo(PseudoClass),
}

/// Simple selectors with no combinator between them, e.g. `a.btn[href]:first-child`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub parts: SmallVec<[SimpleSelector; 4]>,
    pub pseudo_element: Option<String>,
}

/// Relationship between two compound selectors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace
    Descendant,
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    SubsequentSibling,
}

/// Compound selectors joined by combinators.
///
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`; the
/// last compound is the subject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

/// Comma-separated list of complex selectors
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
    source: String,
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl SelectorList {
    /// Parse selector text
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let source = input.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut selectors = Vec::new();
        let mut rest = source;
        loop {
            let (after, complex) = parse_complex(rest, source)?;
            selectors.push(complex);
            let after = after.trim_start();
            if after.is_empty() {
                break;
            }
            match after.strip_prefix(',') {
                Some(next) => rest = next.trim_start(),
                None => return Err(syntax(source, after)),
            }
        }

        Ok(Self {
            selectors,
            source: source.to_string(),
        })
    }

    /// True if any selector in the list matches `node`
    pub fn matches<T: StyleTree + ?Sized>(&self, tree: &T, node: T::Node) -> bool {
        self.selectors.iter().any(|s| s.matches(tree, node))
    }

    /// Highest specificity among the selectors that match `node`
    pub fn matching_specificity<T: StyleTree + ?Sized>(
        &self,
        tree: &T,
        node: T::Node,
    ) -> Option<Specificity> {
        self.selectors
            .iter()
            .filter(|s| s.matches(tree, node))
            .map(ComplexSelector::specificity)
            .max()
    }
}

impl ComplexSelector {
    pub fn subject(&self) -> Option<&CompoundSelector> {
        self.compounds.last()
    }

    pub fn specificity(&self) -> Specificity {
        self.compounds
            .iter()
            .map(CompoundSelector::specificity)
            .fold(Specificity::default(), |acc, s| acc + s)
    }

    pub fn matches<T: StyleTree + ?Sized>(&self, tree: &T, node: T::Node) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_at(tree, node, n - 1),
        }
    }

    fn matches_at<T: StyleTree + ?Sized>(&self, tree: &T, node: T::Node, index: usize) -> bool {
        if !self.compounds[index].matches(tree, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        let next = index - 1;
        match self.combinators[next] {
            Combinator::Child => tree
                .parent(node)
                .is_some_and(|p| self.matches_at(tree, p, next)),
            Combinator::Descendant => {
                let mut current = tree.parent(node);
                while let Some(ancestor) = current {
                    if self.matches_at(tree, ancestor, next) {
                        return true;
                    }
                    current = tree.parent(ancestor);
                }
                false
            }
            Combinator::NextSibling => previous_siblings(tree, node)
                .last()
                .is_some_and(|&s| self.matches_at(tree, s, next)),
            Combinator::SubsequentSibling => previous_siblings(tree, node)
                .into_iter()
                .any(|s| self.matches_at(tree, s, next)),
        }
    }
}

impl CompoundSelector {
    pub fn specificity(&self) -> Specificity {
        let mut spec = Specificity::default();
        for part in &self.parts {
            spec = spec + part.specificity();
        }
        if self.pseudo_element.is_some() {
            spec.2 += 1;
        }
        spec
    }

    /// Pseudo-elements match their originating element
    pub fn matches<T: StyleTree + ?Sized>(&self, tree: &T, node: T::Node) -> bool {
        self.parts.iter().all(|p| p.matches(tree, node))
    }
}

impl SimpleSelector {
    fn specificity(&self) -> Specificity {
        match self {
            SimpleSelector::Universal => Specificity::default(),
            SimpleSelector::Type(_) => Specificity(0, 0, 1),
            SimpleSelector::Id(_) => Specificity(1, 0, 0),
            SimpleSelector::Class(_) | SimpleSelector::Attribute { .. } => Specificity(0, 1, 0),
            SimpleSelector::Pseudo(PseudoClass::Where(_)) => Specificity::default(),
            SimpleSelector::Pseudo(PseudoClass::Not(list) | PseudoClass::Is(list)) => list
                .iter()
                .map(CompoundSelector::specificity)
                .max()
                .unwrap_or_default(),
            SimpleSelector::Pseudo(_) => Specificity(0, 1, 0),
        }
    }

    fn matches<T: StyleTree + ?Sized>(&self, tree: &T, node: T::Node) -> bool {
        match self {
            SimpleSelector::Universal => true,
            SimpleSelector::Type(name) => tree.tag_name(node).eq_ignore_ascii_case(name),
            SimpleSelector::Id(id) => tree.id(node) == Some(id.as_str()),
            SimpleSelector::Class(class) => tree.classes(node).iter().any(|c| *c == class.as_str()),
            SimpleSelector::Attribute { name, op } => match (tree.attribute(node, name), op) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some((op, expected))) => op.test(actual, expected),
            },
            SimpleSelector::Pseudo(pseudo) => pseudo.matches(tree, node),
        }
    }
}

impl PseudoClass {
    fn matches<T: StyleTree + ?Sized>(&self, tree: &T, node: T::Node) -> bool {
        match self {
            PseudoClass::FirstChild => position(tree, node, false).0 == 1,
            PseudoClass::LastChild => {
                let (index, count) = position(tree, node, false);
                index == count
            }
            PseudoClass::OnlyChild => position(tree, node, false).1 == 1,
            PseudoClass::NthChild(nth) => nth.matches(position(tree, node, false).0 as i32),
            PseudoClass::NthLastChild(nth) => {
                let (index, count) = position(tree, node, false);
                nth.matches((count - index + 1) as i32)
            }
            PseudoClass::FirstOfType => position(tree, node, true).0 == 1,
            PseudoClass::LastOfType => {
                let (index, count) = position(tree, node, true);
                index == count
            }
            PseudoClass::NthOfType(nth) => nth.matches(position(tree, node, true).0 as i32),
            PseudoClass::Root => tree.parent(node).is_none(),
            PseudoClass::Empty => tree.children(node).is_empty(),
            PseudoClass::Disabled => tree.attribute(node, "disabled").is_some(),
            PseudoClass::Enabled => tree.attribute(node, "disabled").is_none(),
            PseudoClass::Checked => tree.attribute(node, "checked").is_some(),
            PseudoClass::Not(list) => !list.iter().any(|c| c.matches(tree, node)),
            PseudoClass::Is(list) | PseudoClass::Where(list) => {
                list.iter().any(|c| c.matches(tree, node))
            }
        }
    }
}

/// 1-based position among element siblings (optionally only same-tag ones)
/// and the size of that sibling set
fn position<T: StyleTree + ?Sized>(tree: &T, node: T::Node, same_type: bool) -> (usize, usize) {
    let Some(parent) = tree.parent(node) else {
        return (1, 1);
    };
    let tag = tree.tag_name(node);
    let siblings: Vec<T::Node> = tree
        .children(parent)
        .into_iter()
        .filter(|&s| !same_type || tree.tag_name(s).eq_ignore_ascii_case(tag))
        .collect();
    let index = siblings.iter().position(|&s| s == node).map_or(1, |i| i + 1);
    (index, siblings.len().max(1))
}

fn previous_siblings<T: StyleTree + ?Sized>(tree: &T, node: T::Node) -> Vec<T::Node> {
    let Some(parent) = tree.parent(node) else {
        return Vec::new();
    };
    tree.children(parent)
        .into_iter()
        .take_while(|&s| s != node)
        .collect()
}

/// Remove single-colon pseudo-classes (and their arguments) from a selector.
///
/// `::pseudo-elements` are kept verbatim. Colons inside attribute values and
/// quoted strings are left alone.
///
/// ```rust
/// use tint_theme::selector::strip_pseudo_classes;
///
/// assert_eq!(strip_pseudo_classes(".btn:hover .icon"), ".btn .icon");
/// assert_eq!(strip_pseudo_classes("a:focus-visible::after"), "a::after");
/// assert_eq!(strip_pseudo_classes("li:not(.x):hover"), "li");
/// ```
pub fn strip_pseudo_classes(selector: &str) -> String {
    let chars: Vec<char> = selector.chars().collect();
    let mut out = String::with_capacity(selector.len());
    let mut i = 0;
    let mut bracket_depth = 0usize;
    let mut quote: Option<char> = None;

    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
                i += 1;
            }
            '[' => {
                bracket_depth += 1;
                out.push(c);
                i += 1;
            }
            ']' => {
                bracket_depth = bracket_depth.saturating_sub(1);
                out.push(c);
                i += 1;
            }
            ':' if bracket_depth == 0 && chars.get(i + 1) == Some(&':') => {
                // Pseudo-element: copy through its name
                out.push_str("::");
                i += 2;
                while i < chars.len() && is_ident_char(chars[i]) {
                    out.push(chars[i]);
                    i += 1;
                }
            }
            ':' if bracket_depth == 0 => {
                let start = i + 1;
                i = start;
                while i < chars.len() && is_ident_char(chars[i]) {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                if LEGACY_PSEUDO_ELEMENTS.contains(&name.to_ascii_lowercase().as_str()) {
                    out.push(':');
                    out.push_str(&name);
                    continue;
                }
                if chars.get(i) == Some(&'(') {
                    let mut depth = 0usize;
                    while i < chars.len() {
                        match chars[i] {
                            '(' => depth += 1,
                            ')' => {
                                depth -= 1;
                                if depth == 0 {
                                    i += 1;
                                    break;
                                }
                            }
                            _ => {}
                        }
                        i += 1;
                    }
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Parsing
// ============================================================================

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn syntax(selector: &str, near: &str) -> SelectorError {
    SelectorError::Syntax {
        selector: selector.to_string(),
        near: near.chars().take(30).collect(),
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(is_ident_char)(input)
}

/// Quoted string or bare identifier (attribute values)
fn attr_value(input: &str) -> IResult<&str, &str> {
    if let Ok((rest, quote)) = one_of::<_, _, nom::error::Error<&str>>("\"'")(input) {
        let (rest, value) = take_till(|c: char| c == quote)(rest)?;
        let (rest, _) = char(quote)(rest)?;
        return Ok((rest, value));
    }
    identifier(input)
}

fn attr_op(input: &str) -> IResult<&str, AttrOp> {
    let (rest, prefix) = opt(one_of("~|^$*"))(input)?;
    let (rest, _) = char('=')(rest)?;
    let op = match prefix {
        None => AttrOp::Equals,
        Some('~') => AttrOp::Includes,
        Some('|') => AttrOp::DashMatch,
        Some('^') => AttrOp::Prefix,
        Some('$') => AttrOp::Suffix,
        _ => AttrOp::Substring,
    };
    Ok((rest, op))
}

/// Parse `[name]` or `[name op value]`; the leading `[` is already consumed
fn attribute(input: &str) -> IResult<&str, SimpleSelector> {
    let (rest, _) = multispace0(input)?;
    let (rest, name) = identifier(rest)?;
    let (rest, _) = multispace0(rest)?;
    if let Ok((rest, _)) = char::<_, nom::error::Error<&str>>(']')(rest) {
        return Ok((
            rest,
            SimpleSelector::Attribute {
                name: name.to_ascii_lowercase(),
                op: None,
            },
        ));
    }
    let (rest, op) = attr_op(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = attr_value(rest)?;
    let (rest, _) = multispace0(rest)?;
    // Case-sensitivity flags are accepted and ignored
    let (rest, _) = opt(one_of("iIsS"))(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(']')(rest)?;
    Ok((
        rest,
        SimpleSelector::Attribute {
            name: name.to_ascii_lowercase(),
            op: Some((op, value.to_string())),
        },
    ))
}

/// Split a balanced parenthesised argument; `input` starts just after `(`
fn parenthesised(input: &str) -> Option<(&str, &str)> {
    let mut depth = 1usize;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&input[i + 1..], &input[..i]));
                }
            }
            _ => {}
        }
    }
    None
}

fn compound_list(args: &str, source: &str) -> Result<Vec<CompoundSelector>, SelectorError> {
    args.split(',')
        .map(|part| {
            let part = part.trim();
            let (rest, compound) = parse_compound(part, source)?;
            if rest.trim().is_empty() {
                Ok(compound)
            } else {
                Err(syntax(source, rest))
            }
        })
        .collect()
}

fn pseudo_class(
    name: &str,
    args: Option<&str>,
    source: &str,
) -> Result<PseudoClass, SelectorError> {
    let lower = name.to_ascii_lowercase();
    if STATEFUL_PSEUDO_CLASSES.contains(&lower.as_str()) {
        return Err(SelectorError::StatefulPseudoClass(lower));
    }
    let nth = |args: Option<&str>| {
        args.and_then(Nth::parse)
            .ok_or_else(|| syntax(source, args.unwrap_or(name)))
    };
    let pseudo = match lower.as_str() {
        "first-child" => PseudoClass::FirstChild,
        "last-child" => PseudoClass::LastChild,
        "only-child" => PseudoClass::OnlyChild,
        "nth-child" => PseudoClass::NthChild(nth(args)?),
        "nth-last-child" => PseudoClass::NthLastChild(nth(args)?),
        "first-of-type" => PseudoClass::FirstOfType,
        "last-of-type" => PseudoClass::LastOfType,
        "nth-of-type" => PseudoClass::NthOfType(nth(args)?),
        "root" => PseudoClass::Root,
        "empty" => PseudoClass::Empty,
        "disabled" => PseudoClass::Disabled,
        "enabled" => PseudoClass::Enabled,
        "checked" => PseudoClass::Checked,
        "not" | "is" | "where" => {
            let list = compound_list(args.unwrap_or(""), source)?;
            match lower.as_str() {
                "not" => PseudoClass::Not(list),
                "is" => PseudoClass::Is(list),
                _ => PseudoClass::Where(list),
            }
        }
        _ => return Err(SelectorError::UnknownPseudoClass(lower)),
    };
    Ok(pseudo)
}

/// Parse one compound selector
fn parse_compound<'a>(
    input: &'a str,
    source: &str,
) -> Result<(&'a str, CompoundSelector), SelectorError> {
    let mut compound = CompoundSelector::default();
    let mut rest = input;

    if let Some(after) = rest.strip_prefix('*') {
        compound.parts.push(SimpleSelector::Universal);
        rest = after;
    } else if let Ok((after, tag)) = identifier(rest) {
        compound
            .parts
            .push(SimpleSelector::Type(tag.to_ascii_lowercase()));
        rest = after;
    }

    loop {
        if let Some(after) = rest.strip_prefix('#') {
            let (after, id) = identifier(after).map_err(|_| syntax(source, rest))?;
            compound.parts.push(SimpleSelector::Id(id.to_string()));
            rest = after;
        } else if let Some(after) = rest.strip_prefix('.') {
            let (after, class) = identifier(after).map_err(|_| syntax(source, rest))?;
            compound.parts.push(SimpleSelector::Class(class.to_string()));
            rest = after;
        } else if let Some(after) = rest.strip_prefix('[') {
            let (after, attr) = attribute(after).map_err(|_| syntax(source, rest))?;
            compound.parts.push(attr);
            rest = after;
        } else if let Some(after) = rest.strip_prefix("::") {
            let (after, name) = identifier(after).map_err(|_| syntax(source, rest))?;
            compound.pseudo_element = Some(name.to_ascii_lowercase());
            rest = after;
            break;
        } else if let Some(after) = rest.strip_prefix(':') {
            let (after, name) = identifier(after).map_err(|_| syntax(source, rest))?;
            if LEGACY_PSEUDO_ELEMENTS.contains(&name.to_ascii_lowercase().as_str()) {
                compound.pseudo_element = Some(name.to_ascii_lowercase());
                rest = after;
                break;
            }
            let (after, args) = match after.strip_prefix('(') {
                Some(inner) => {
                    let (after, args) =
                        parenthesised(inner).ok_or_else(|| syntax(source, rest))?;
                    (after, Some(args))
                }
                None => (after, None),
            };
            compound
                .parts
                .push(SimpleSelector::Pseudo(pseudo_class(name, args, source)?));
            rest = after;
        } else {
            break;
        }
    }

    if compound.parts.is_empty() && compound.pseudo_element.is_none() {
        return Err(syntax(source, input));
    }
    Ok((rest, compound))
}

/// Parse compound selectors joined by combinators, stopping at `,` or end
fn parse_complex<'a>(
    input: &'a str,
    source: &str,
) -> Result<(&'a str, ComplexSelector), SelectorError> {
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut rest = input;

    loop {
        let (after, compound) = parse_compound(rest, source)?;
        compounds.push(compound);

        let trimmed = after.trim_start();
        if trimmed.is_empty() || trimmed.starts_with(',') {
            rest = trimmed;
            break;
        }

        let (combinator, next) = match trimmed.chars().next() {
            Some('>') => (Combinator::Child, &trimmed[1..]),
            Some('+') => (Combinator::NextSibling, &trimmed[1..]),
            Some('~') => (Combinator::SubsequentSibling, &trimmed[1..]),
            _ if trimmed.len() < after.len() => (Combinator::Descendant, trimmed),
            _ => return Err(syntax(source, trimmed)),
        };
        combinators.push(combinator);
        rest = next.trim_start();
    }

    Ok((
        rest,
        ComplexSelector {
            compounds,
            combinators,
        },
    ))
}
