//! Theme editor session
//!
//! Holds the current theme document and funnels every edit through the
//! variable store. Edits only touch the canonical part: the override region
//! is split off first and re-appended unchanged, so variables declared inside
//! override rules are never hoisted into `:root`. Variables outside the schema
//! that were written into `:root` are kept across edits.

use tracing::{debug, warn};

use crate::color::{hex_to_rgb_triple, rgb_triple_to_hex};
use crate::overrides::{self, OverrideRule};
use crate::schema;
use crate::variables::VariableMap;

/// Editable theme document
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThemeSession {
    css: String,
}

impl ThemeSession {
    pub fn new(css: impl Into<String>) -> Self {
        Self { css: css.into() }
    }

    /// Current document text
    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn into_css(self) -> String {
        self.css
    }

    /// Replace the document wholesale
    pub fn reset(&mut self, css: impl Into<String>) {
        self.css = css.into();
    }

    /// Set a color from a hex string.
    ///
    /// `key` may be short (`primary`, `gradient-brand-start`) or a full
    /// variable name. Invalid hex leaves the document untouched.
    pub fn update_color(&mut self, key: &str, hex: &str) -> &str {
        let Some(triple) = hex_to_rgb_triple(hex) else {
            warn!(key, hex, "ignoring invalid hex color");
            return &self.css;
        };
        let name = schema::color_variable_name(key);
        debug!(%name, %triple, "updating color");
        self.rewrite(|vars| vars.set(&name, triple));
        &self.css
    }

    /// Set any variable to a raw value
    pub fn update_value(&mut self, name: &str, value: &str) -> &str {
        debug!(name, value, "updating value");
        self.rewrite(|vars| vars.set(name, value.trim()));
        &self.css
    }

    /// Variables declared in the canonical part of the document
    pub fn variables(&self) -> VariableMap {
        VariableMap::parse(&overrides::extract(&self.css).base)
    }

    /// Effective value of a variable, falling back to its schema default
    pub fn value(&self, name: &str) -> Option<String> {
        self.variables().get_or_default(name).map(str::to_string)
    }

    /// Color variable as `#rrggbb`, if it holds a valid triple
    pub fn color_hex(&self, key: &str) -> Option<String> {
        let triple = self.value(&schema::color_variable_name(key))?;
        let hex = rgb_triple_to_hex(&triple);
        (!hex.is_empty()).then_some(hex)
    }

    pub fn override_rules(&self) -> Vec<OverrideRule> {
        overrides::override_rules(&self.css)
    }

    /// Add or replace the override rule for `selector`
    pub fn upsert_override(&mut self, selector: &str, properties: &str) -> &str {
        self.css = overrides::upsert_rule(&self.css, selector, properties);
        &self.css
    }

    /// Remove the override rule for `selector`
    pub fn delete_override(&mut self, selector: &str) -> &str {
        self.css = overrides::delete_rule_by_selector(&self.css, selector);
        &self.css
    }

    fn rewrite(&mut self, edit: impl FnOnce(&mut VariableMap)) {
        let extracted = overrides::extract(&self.css);
        let mut vars = VariableMap::parse(&extracted.base);
        edit(&mut vars);
        self.css = extracted.reattach(&vars.serialize_with_extras());
    }
}
