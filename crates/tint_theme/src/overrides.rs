//! Override region manager
//!
//! A theme document may end with a block of free-form rules introduced by the
//! [`OVERRIDE_MARKER`] comment:
//!
//! ```css
//! :root { --oui-color-primary: 176 132 233; ... }
//!
//! /* AI Fine-Tune Overrides */
//! .btn { color: red }
//! .card:hover { border-color: rgb(var(--oui-color-primary)) }
//! ```
//!
//! All operations here are pure string transforms. A document without the
//! marker simply has no overrides.
//!
//! The region runs from the marker up to the next marker occurrence or the
//! end of the document. A well-formed document therefore never contains the
//! marker text inside rule content.

use std::fmt;
use std::sync::OnceLock;

use regex::{NoExpand, Regex};
use tracing::debug;

/// Literal comment that opens the override region
pub const OVERRIDE_MARKER: &str = "/* AI Fine-Tune Overrides */";

static REGION: OnceLock<Regex> = OnceLock::new();
static RULE: OnceLock<Regex> = OnceLock::new();
static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();

fn region_re() -> &'static Regex {
    REGION.get_or_init(|| {
        let marker = regex::escape(OVERRIDE_MARKER);
        Regex::new(&format!(r"(?s){marker}(.*?)(?:{marker}|\z)")).expect("valid regex")
    })
}

fn rule_re() -> &'static Regex {
    RULE.get_or_init(|| Regex::new(r"([^{}]+)\{([^{}]*)\}").expect("valid regex"))
}

fn blank_lines_re() -> &'static Regex {
    BLANK_LINES.get_or_init(|| Regex::new(r"\n{3,}").expect("valid regex"))
}

fn whitespace_re() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// One `selector { properties }` rule from the override region.
///
/// `properties` is kept as opaque text: the declarations are not parsed.
/// Equality ignores the raw source text.
#[derive(Clone, Debug)]
pub struct OverrideRule {
    pub selector: String,
    pub properties: String,
    raw: String,
}

impl OverrideRule {
    pub fn new(selector: impl AsRef<str>, properties: impl AsRef<str>) -> Self {
        let selector = selector.as_ref().trim().to_string();
        let properties = normalize_properties(properties.as_ref());
        let raw = format!("{} {{ {} }}", selector, properties);
        Self {
            selector,
            properties,
            raw,
        }
    }

    /// Text of the rule as it appeared in the document
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Canonical `selector { properties }` form
    pub fn to_css(&self) -> String {
        format!("{} {{ {} }}", self.selector, self.properties)
    }
}

impl PartialEq for OverrideRule {
    fn eq(&self, other: &Self) -> bool {
        self.selector == other.selector && self.properties == other.properties
    }
}

impl Eq for OverrideRule {}

impl fmt::Display for OverrideRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ {} }}", self.selector, self.properties)
    }
}

/// A document split into its canonical part and its override region
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedOverrides {
    /// Document with the marker and region removed
    pub base: String,
    /// Trimmed region text after the marker, empty when there is none
    pub region: String,
    found: bool,
}

impl ExtractedOverrides {
    /// True when the document carried the marker
    pub fn has_marker(&self) -> bool {
        self.found
    }

    pub fn rules(&self) -> Vec<OverrideRule> {
        parse_rules(&self.region)
    }

    /// Rebuild a document from `base` and this region, text unchanged
    pub fn reattach(&self, base: &str) -> String {
        if self.region.is_empty() {
            return base.to_string();
        }
        join_region(base, &self.region)
    }
}

/// Split `document` at the override marker.
///
/// Runs of three or more newlines left behind are collapsed to two so that
/// repeated edits do not grow the document.
pub fn extract(document: &str) -> ExtractedOverrides {
    let Some(caps) = region_re().captures(document) else {
        return ExtractedOverrides {
            base: document.to_string(),
            region: String::new(),
            found: false,
        };
    };

    let window_start = caps.get(0).map_or(0, |m| m.start());
    let window_end = caps.get(1).map_or(window_start, |m| m.end());
    let region = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();

    let mut base = String::with_capacity(document.len());
    base.push_str(&document[..window_start]);
    base.push_str(&document[window_end..]);
    let base = collapse_blank_lines(&base).trim().to_string();

    ExtractedOverrides {
        base,
        region,
        found: true,
    }
}

/// Scan region text for `selector { properties }` rules
pub fn parse_rules(region: &str) -> Vec<OverrideRule> {
    rule_re()
        .captures_iter(region)
        .filter_map(|caps| {
            let selector = caps[1].trim();
            if selector.is_empty() {
                return None;
            }
            let raw = caps.get(0).map_or("", |m| m.as_str()).trim().to_string();
            Some(OverrideRule {
                selector: selector.to_string(),
                properties: normalize_properties(&caps[2]),
                raw,
            })
        })
        .collect()
}

/// Rules currently in the document's override region
pub fn override_rules(document: &str) -> Vec<OverrideRule> {
    extract(document).rules()
}

/// Add a rule, or replace the properties of the rule with the same selector.
///
/// Selectors are compared as exact strings after trimming. A replaced rule
/// keeps its position; a new rule is appended.
pub fn upsert_rule(document: &str, selector: &str, properties: &str) -> String {
    let extracted = extract(document);
    let mut rules = extracted.rules();
    let incoming = OverrideRule::new(selector, properties);

    match rules.iter_mut().find(|r| r.selector == incoming.selector) {
        Some(existing) => *existing = incoming,
        None => rules.push(incoming),
    }

    assemble(&extracted.base, &rules)
}

/// Remove the first occurrence of `rule` from the override region.
///
/// Matching uses the rule's raw text with any run of whitespace made
/// optional. The marker is dropped once no rules remain.
pub fn delete_rule(document: &str, rule: &OverrideRule) -> String {
    let extracted = extract(document);
    if !extracted.has_marker() {
        return document.to_string();
    }

    let escaped = regex::escape(rule.raw().trim());
    let pattern = whitespace_re().replace_all(&escaped, NoExpand(r"\s*"));
    let remaining = match Regex::new(&pattern) {
        Ok(re) => re.replacen(&extracted.region, 1, "").trim().to_string(),
        Err(err) => {
            debug!(%err, selector = %rule.selector, "override rule pattern rejected");
            extracted.region.clone()
        }
    };

    if parse_rules(&remaining).is_empty() {
        return extracted.base;
    }
    join_region(&extracted.base, &collapse_blank_lines(&remaining))
}

/// Remove the rule whose selector equals `selector`, if any
pub fn delete_rule_by_selector(document: &str, selector: &str) -> String {
    let selector = selector.trim();
    match override_rules(document)
        .into_iter()
        .find(|r| r.selector == selector)
    {
        Some(rule) => delete_rule(document, &rule),
        None => document.to_string(),
    }
}

/// Rebuild a document from `base` and a rule list
pub fn assemble(base: &str, rules: &[OverrideRule]) -> String {
    if rules.is_empty() {
        return base.to_string();
    }
    let body = rules
        .iter()
        .map(OverrideRule::to_css)
        .collect::<Vec<_>>()
        .join("\n");
    join_region(base, &body)
}

fn join_region(base: &str, region: &str) -> String {
    let base = base.trim_end();
    if base.is_empty() {
        format!("{}\n{}", OVERRIDE_MARKER, region)
    } else {
        format!("{}\n\n{}\n{}", base, OVERRIDE_MARKER, region)
    }
}

fn normalize_properties(properties: &str) -> String {
    let trimmed = properties.trim();
    trimmed
        .strip_suffix(';')
        .unwrap_or(trimmed)
        .trim_end()
        .to_string()
}

fn collapse_blank_lines(text: &str) -> String {
    blank_lines_re().replace_all(text, "\n\n").into_owned()
}
