//! Canonical variable schema
//!
//! The fixed catalogue of theme variables a generated sheet always contains,
//! in output order, each with its default literal. Names carry no `--` prefix.

/// Variable families, derived from the name prefix
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum VariableFamily {
    /// `oui-font-*`
    Font,
    /// `oui-color-*`, stored as `R G B` channel triples
    Color,
    /// `oui-gradient-*` (start/end colors, stop positions, angle)
    Gradient,
    /// `oui-rounded[-suffix]`
    Radius,
    /// `oui-spacing-*`
    Spacing,
}

impl VariableFamily {
    /// Classify a variable name (with or without the leading `--`)
    pub fn of(name: &str) -> Option<Self> {
        let name = name.strip_prefix("--").unwrap_or(name);
        if name.starts_with("oui-font-") {
            Some(Self::Font)
        } else if name.starts_with("oui-color-") {
            Some(Self::Color)
        } else if name.starts_with("oui-gradient-") {
            Some(Self::Gradient)
        } else if name == "oui-rounded" || name.starts_with("oui-rounded-") {
            Some(Self::Radius)
        } else if name.starts_with("oui-spacing-") {
            Some(Self::Spacing)
        } else {
            None
        }
    }
}

/// One schema variable and its default value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemaEntry {
    pub name: &'static str,
    pub default: &'static str,
}

impl SchemaEntry {
    const fn new(name: &'static str, default: &'static str) -> Self {
        Self { name, default }
    }

    pub fn family(&self) -> VariableFamily {
        // Every catalogue name is classified; see `test_every_entry_has_family`
        VariableFamily::of(self.name).unwrap_or(VariableFamily::Color)
    }

    /// True for entries whose value is an `R G B` triple
    pub fn is_color_triple(&self) -> bool {
        match self.family() {
            VariableFamily::Color => true,
            VariableFamily::Gradient => {
                !self.name.contains("-stop-")
                    && (self.name.ends_with("-start") || self.name.ends_with("-end"))
            }
            _ => false,
        }
    }
}

pub const FONT_FAMILY: &str = "oui-font-family";
pub const FONT_SIZE_BASE: &str = "oui-font-size-base";

const ENTRIES: &[SchemaEntry] = &[
    // Font
    SchemaEntry::new(FONT_FAMILY, "'Manrope', sans-serif"),
    SchemaEntry::new(FONT_SIZE_BASE, "16px"),
    // Brand colors
    SchemaEntry::new("oui-color-primary", "176 132 233"),
    SchemaEntry::new("oui-color-primary-light", "208 140 237"),
    SchemaEntry::new("oui-color-primary-darken", "137 76 209"),
    SchemaEntry::new("oui-color-primary-contrast", "255 255 255"),
    SchemaEntry::new("oui-color-link", "189 107 237"),
    SchemaEntry::new("oui-color-link-light", "217 152 250"),
    SchemaEntry::new("oui-color-secondary", "255 255 255"),
    SchemaEntry::new("oui-color-tertiary", "218 218 218"),
    SchemaEntry::new("oui-color-quaternary", "218 218 218"),
    // Semantic colors
    SchemaEntry::new("oui-color-danger", "245 97 139"),
    SchemaEntry::new("oui-color-danger-light", "250 167 188"),
    SchemaEntry::new("oui-color-danger-darken", "237 72 122"),
    SchemaEntry::new("oui-color-danger-contrast", "255 255 255"),
    SchemaEntry::new("oui-color-success", "41 233 169"),
    SchemaEntry::new("oui-color-success-light", "101 240 194"),
    SchemaEntry::new("oui-color-success-darken", "0 161 120"),
    SchemaEntry::new("oui-color-success-contrast", "255 255 255"),
    SchemaEntry::new("oui-color-warning", "255 209 70"),
    SchemaEntry::new("oui-color-warning-light", "255 229 133"),
    SchemaEntry::new("oui-color-warning-darken", "255 152 0"),
    SchemaEntry::new("oui-color-warning-contrast", "255 255 255"),
    // Surfaces
    SchemaEntry::new("oui-color-fill", "36 32 47"),
    SchemaEntry::new("oui-color-fill-active", "40 46 58"),
    SchemaEntry::new("oui-color-base-1", "93 83 123"),
    SchemaEntry::new("oui-color-base-2", "81 72 107"),
    SchemaEntry::new("oui-color-base-3", "68 61 69"),
    SchemaEntry::new("oui-color-base-4", "57 52 74"),
    SchemaEntry::new("oui-color-base-5", "51 46 66"),
    SchemaEntry::new("oui-color-base-6", "43 38 56"),
    SchemaEntry::new("oui-color-base-7", "36 32 47"),
    SchemaEntry::new("oui-color-base-8", "29 26 38"),
    SchemaEntry::new("oui-color-base-9", "22 20 28"),
    SchemaEntry::new("oui-color-base-10", "14 13 18"),
    SchemaEntry::new("oui-color-base-foreground", "255 255 255"),
    SchemaEntry::new("oui-color-line", "255 255 255"),
    // Trading
    SchemaEntry::new("oui-color-trading-loss", "245 97 139"),
    SchemaEntry::new("oui-color-trading-loss-contrast", "255 255 255"),
    SchemaEntry::new("oui-color-trading-profit", "41 233 169"),
    SchemaEntry::new("oui-color-trading-profit-contrast", "255 255 255"),
    // Gradients
    SchemaEntry::new("oui-gradient-primary-start", "40 0 97"),
    SchemaEntry::new("oui-gradient-primary-end", "189 107 237"),
    SchemaEntry::new("oui-gradient-secondary-start", "81 42 121"),
    SchemaEntry::new("oui-gradient-secondary-end", "176 132 233"),
    SchemaEntry::new("oui-gradient-success-start", "1 83 68"),
    SchemaEntry::new("oui-gradient-success-end", "41 223 169"),
    SchemaEntry::new("oui-gradient-danger-start", "153 24 76"),
    SchemaEntry::new("oui-gradient-danger-end", "245 97 139"),
    SchemaEntry::new("oui-gradient-brand-start", "231 219 255"),
    SchemaEntry::new("oui-gradient-brand-end", "156 117 255"),
    SchemaEntry::new("oui-gradient-brand-stop-start", "6.62%"),
    SchemaEntry::new("oui-gradient-brand-stop-end", "86.5%"),
    SchemaEntry::new("oui-gradient-brand-angle", "17.44deg"),
    SchemaEntry::new("oui-gradient-warning-start", "152 58 8"),
    SchemaEntry::new("oui-gradient-warning-end", "255 207 115"),
    SchemaEntry::new("oui-gradient-neutral-start", "27 29 24"),
    SchemaEntry::new("oui-gradient-neutral-end", "38 41 46"),
    // Corner radii
    SchemaEntry::new("oui-rounded-sm", "2px"),
    SchemaEntry::new("oui-rounded", "4px"),
    SchemaEntry::new("oui-rounded-md", "6px"),
    SchemaEntry::new("oui-rounded-lg", "8px"),
    SchemaEntry::new("oui-rounded-xl", "12px"),
    SchemaEntry::new("oui-rounded-2xl", "16px"),
    SchemaEntry::new("oui-rounded-full", "9999px"),
    // Spacing
    SchemaEntry::new("oui-spacing-xs", "20rem"),
    SchemaEntry::new("oui-spacing-sm", "22.5rem"),
    SchemaEntry::new("oui-spacing-md", "26.25rem"),
    SchemaEntry::new("oui-spacing-lg", "30rem"),
    SchemaEntry::new("oui-spacing-xl", "33.75rem"),
];

/// All schema entries in canonical output order
pub fn entries() -> &'static [SchemaEntry] {
    ENTRIES
}

/// Look up a schema entry by name (with or without the leading `--`)
pub fn entry(name: &str) -> Option<&'static SchemaEntry> {
    let name = name.strip_prefix("--").unwrap_or(name);
    ENTRIES.iter().find(|e| e.name == name)
}

/// Default literal for a schema variable
pub fn default_value(name: &str) -> Option<&'static str> {
    entry(name).map(|e| e.default)
}

pub fn is_schema_variable(name: &str) -> bool {
    entry(name).is_some()
}

/// Expand a short color key to its full variable name.
///
/// `primary` becomes `oui-color-primary`, `gradient-brand-start` becomes
/// `oui-gradient-brand-start`. Names already starting with `oui-` (or
/// `--oui-`) are returned without the dashes.
pub fn color_variable_name(key: &str) -> String {
    let key = key.strip_prefix("--").unwrap_or(key);
    if key.starts_with("oui-") {
        key.to_string()
    } else if key.starts_with("gradient-") {
        format!("oui-{key}")
    } else {
        format!("oui-color-{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_names_are_unique() {
        let mut seen = FxHashSet::default();
        for e in entries() {
            assert!(seen.insert(e.name), "duplicate schema name {}", e.name);
        }
    }

    #[test]
    fn test_every_entry_has_family() {
        for e in entries() {
            assert!(VariableFamily::of(e.name).is_some(), "{}", e.name);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(default_value("oui-color-danger"), Some("245 97 139"));
        assert_eq!(default_value("--oui-rounded"), Some("4px"));
        assert_eq!(default_value("oui-color-nope"), None);
        assert!(is_schema_variable("oui-spacing-xl"));
    }

    #[test]
    fn test_color_triples() {
        assert!(entry("oui-color-primary").unwrap().is_color_triple());
        assert!(entry("oui-gradient-brand-end").unwrap().is_color_triple());
        assert!(!entry("oui-gradient-brand-stop-end").unwrap().is_color_triple());
        assert!(!entry("oui-gradient-brand-angle").unwrap().is_color_triple());
        assert!(!entry("oui-rounded-lg").unwrap().is_color_triple());
    }

    #[test]
    fn test_color_variable_name() {
        assert_eq!(color_variable_name("primary"), "oui-color-primary");
        assert_eq!(
            color_variable_name("gradient-brand-start"),
            "oui-gradient-brand-start"
        );
        assert_eq!(color_variable_name("--oui-color-line"), "oui-color-line");
    }
}
