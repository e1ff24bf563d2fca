//! Variable store
//!
//! Reads CSS custom-property declarations out of a theme document and writes
//! the canonical `:root { ... }` block back out.
//!
//! Parsing is a best-effort scan, not a validating parser. Every
//! `--name: value;` fragment in the input is picked up, including ones that
//! sit inside the override region. Fragments that do not fit the pattern are
//! skipped silently.
//!
//! Serialization always emits the full [`schema`](crate::schema), falling
//! back to each entry's default. It never emits the override region: callers
//! that need overrides preserved go through [`ThemeSession`] or re-append the
//! region text themselves.
//!
//! [`ThemeSession`]: crate::session::ThemeSession

use std::fmt::Write as _;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::trace;

use crate::schema::{self, FONT_FAMILY, FONT_SIZE_BASE};

static DECLARATION: OnceLock<Regex> = OnceLock::new();

/// `--name: value;` with name up to the next colon and value up to the next
/// semicolon
fn declaration_re() -> &'static Regex {
    DECLARATION.get_or_init(|| Regex::new(r"--([^:]+):\s*([^;]+);").expect("valid regex"))
}

/// True when `name` can be written back as `--name` without breaking the sheet
pub fn is_valid_variable_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Ordered name → raw value map of custom properties.
///
/// Names are stored without the leading `--`. Insertion order is kept so
/// output stays stable across edits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableMap {
    entries: IndexMap<String, String>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `css` for custom-property declarations.
    ///
    /// Later declarations of the same name overwrite earlier values but keep
    /// the first position.
    pub fn parse(css: &str) -> Self {
        let mut map = Self::new();
        for caps in declaration_re().captures_iter(css) {
            let name = caps[1].trim();
            let value = caps[2].trim();
            map.set(name, value);
        }
        trace!(count = map.len(), "parsed theme variables");
        map
    }

    /// Value for `name` (with or without the leading `--`)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(strip_dashes(name)).map(String::as_str)
    }

    /// Value for `name`, or its schema default
    pub fn get_or_default(&self, name: &str) -> Option<&str> {
        self.get(name).or_else(|| schema::default_value(name))
    }

    /// Insert or replace a value; new names are appended
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = strip_dashes(name.as_ref());
        if let Some(slot) = self.entries.get_mut(name) {
            *slot = value.into();
        } else {
            self.entries.insert(name.to_string(), value.into());
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.shift_remove(strip_dashes(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(strip_dashes(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Emit the canonical theme block.
    ///
    /// Every schema entry appears exactly once, in schema order, and nothing
    /// else is declared in `:root`. A trailing `html, body` rule mirrors the
    /// font variables.
    pub fn serialize(&self) -> String {
        self.write_block(false)
    }

    /// Like [`serialize`](Self::serialize), but non-schema entries with a
    /// valid identifier follow the schema entries in insertion order.
    pub fn serialize_with_extras(&self) -> String {
        self.write_block(true)
    }

    fn write_block(&self, extras: bool) -> String {
        let mut out = String::from(":root {\n");
        for entry in schema::entries() {
            let value = self.get(entry.name).unwrap_or(entry.default);
            let _ = writeln!(out, "  --{}: {};", entry.name, value);
        }
        if extras {
            for (name, value) in self.iter() {
                if schema::is_schema_variable(name) || !is_valid_variable_name(name) {
                    continue;
                }
                let _ = writeln!(out, "  --{}: {};", name, value);
            }
        }
        out.push_str("}\n\n");

        let font_family = self.get_or_default(FONT_FAMILY).unwrap_or_default();
        let font_size = self.get_or_default(FONT_SIZE_BASE).unwrap_or_default();
        let _ = write!(
            out,
            "html, body {{\n  font-family: {};\n  font-size: {};\n}}\n",
            font_family, font_size
        );

        trace!(bytes = out.len(), "serialized theme variables");
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            let k: String = k.into();
            map.set(k, v);
        }
        map
    }
}

fn strip_dashes(name: &str) -> &str {
    name.strip_prefix("--").unwrap_or(name)
}

/// Parse a theme document into a variable map
pub fn parse(css: &str) -> VariableMap {
    VariableMap::parse(css)
}

/// Serialize a variable map into a canonical theme block
pub fn serialize(map: &VariableMap) -> String {
    map.serialize()
}
