//! Element scope resolver
//!
//! Answers "which theme variables and override rules are in effect here" for
//! an element of a host tree. Two views are offered:
//!
//! - [`ScopeResolver::element_variables`]: every variable the element or
//!   anything inside it declares or uses, sorted by name.
//! - [`ScopeResolver::scoped_variables`]: only the variables declared along a
//!   selection path (the element and some of its ancestors), sorted by name.
//!   A name declared on several levels takes the closest declaration.
//!
//! Inaccessible stylesheets are skipped and invalid selectors never match, so
//! none of the operations here can fail.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::dom::{ancestors, descendants, ComputedStyleProvider, StyleRuleEnumerator, StyleTree};
use crate::overrides::{self, OverrideRule};
use crate::selector::strip_pseudo_classes;
use crate::stylesheet::{parse_declarations, StyleRule};

static VAR_USAGE: OnceLock<Regex> = OnceLock::new();

fn var_usage_re() -> &'static Regex {
    VAR_USAGE.get_or_init(|| Regex::new(r"var\(\s*(--[A-Za-z0-9_-]+)").expect("valid regex"))
}

/// Resolver settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Only custom properties starting with this prefix are reported
    pub variable_prefix: String,
    /// Ancestors included in a selection path, beyond the element itself
    pub max_ancestors: usize,
    /// Class prefixes treated as framework classes in path strings
    pub framework_class_prefixes: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            variable_prefix: default_variable_prefix(),
            max_ancestors: default_max_ancestors(),
            framework_class_prefixes: default_framework_class_prefixes(),
        }
    }
}

fn default_variable_prefix() -> String {
    "--oui-".to_string()
}

fn default_max_ancestors() -> usize {
    5
}

fn default_framework_class_prefixes() -> Vec<String> {
    vec!["oui-".to_string()]
}

impl ResolverConfig {
    /// True for generated or utility classes that make poor path selectors
    pub fn is_framework_class(&self, class: &str) -> bool {
        class.contains([':', '[', '/'])
            || self
                .framework_class_prefixes
                .iter()
                .any(|p| class.starts_with(p.as_str()))
    }

    fn is_tracked(&self, name: &str) -> bool {
        name.starts_with(self.variable_prefix.as_str())
    }
}

/// A theme variable as seen from one element
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ElementCssVariable {
    /// Property name, including the leading `--`
    pub name: String,
    /// Nearest explicit declaration
    pub value: String,
    /// What the cascade resolved on the element
    pub computed_value: String,
}

/// Resolves variables and override rules against a host's live styles
pub struct ScopeResolver<'a, H: ?Sized> {
    host: &'a H,
    config: ResolverConfig,
}

impl<'a, H> ScopeResolver<'a, H>
where
    H: ComputedStyleProvider + StyleRuleEnumerator + ?Sized,
{
    pub fn new(host: &'a H) -> Self {
        Self::with_config(host, ResolverConfig::default())
    }

    pub fn with_config(host: &'a H, config: ResolverConfig) -> Self {
        Self { host, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Every tracked variable declared or used by `node` or its descendants.
    ///
    /// Names come from inline styles in the subtree and from `var()` usages in
    /// readable rules that match any element of the subtree. Each name is
    /// then resolved against `node`; names with no value anywhere are dropped.
    pub fn element_variables(&self, node: H::Node) -> Vec<ElementCssVariable> {
        let mut subtree = vec![node];
        subtree.extend(descendants(self.host, node));

        let mut names = BTreeSet::new();
        for &element in &subtree {
            let inline = self.host.inline_style(element);
            for (name, _) in parse_declarations(inline) {
                if self.config.is_tracked(name) {
                    names.insert(name.to_string());
                }
            }
            self.collect_usages(inline, &mut names);
        }

        for rule in self.readable_rules() {
            let applies = subtree
                .iter()
                .any(|&element| selector_matches(self.host, element, &rule.selector_text));
            if applies {
                self.collect_usages(&rule.declarations, &mut names);
            }
        }

        let root = self.host.document_element();
        let inline = self.host.inline_style(node);
        let vars: Vec<_> = names
            .into_iter()
            .filter_map(|name| {
                let computed = non_empty(self.host.computed_property(node, &name));
                let at_root = non_empty(self.host.computed_property(root, &name));
                let declared = inline_value(inline, &name);
                let value = declared
                    .clone()
                    .or_else(|| at_root.clone())
                    .or_else(|| computed.clone())?;
                let computed_value = computed.or(at_root).or(declared).unwrap_or_default();
                Some(ElementCssVariable {
                    name,
                    value,
                    computed_value,
                })
            })
            .collect();

        trace!(count = vars.len(), subtree = subtree.len(), "resolved element variables");
        vars
    }

    /// Variables declared on the nodes of `path`, sorted by name.
    ///
    /// `path[0]` is the selected element, followed by its ancestors from the
    /// nearest outward (see [`selection_path`]). A name declared on several
    /// levels is reported once, from the level closest to the selection.
    /// Declarations below the selected element are never considered.
    pub fn scoped_variables(&self, path: &[H::Node]) -> Vec<ElementCssVariable> {
        let Some(&selected) = path.first() else {
            return Vec::new();
        };

        let rules = self.readable_rules();
        let mut seen = FxHashSet::default();
        let mut vars = Vec::new();

        for &level in path {
            let mut declared = BTreeSet::new();
            for (name, _) in parse_declarations(self.host.inline_style(level)) {
                if self.config.is_tracked(name) {
                    declared.insert(name.to_string());
                }
            }
            for rule in &rules {
                if !selector_matches(self.host, level, &rule.selector_text) {
                    continue;
                }
                for (name, _) in rule.declarations() {
                    if self.config.is_tracked(name) {
                        declared.insert(name.to_string());
                    }
                }
            }

            for name in declared {
                if !seen.insert(name.clone()) {
                    continue;
                }
                let at_level = non_empty(self.host.computed_property(level, &name))
                    .or_else(|| inline_value(self.host.inline_style(level), &name));
                let Some(value) = at_level else {
                    continue;
                };
                let computed_value = non_empty(self.host.computed_property(selected, &name))
                    .unwrap_or_else(|| value.clone());
                vars.push(ElementCssVariable {
                    name,
                    value,
                    computed_value,
                });
            }
        }

        vars.sort_by(|a, b| a.name.cmp(&b.name));
        trace!(count = vars.len(), levels = path.len(), "resolved scoped variables");
        vars
    }

    /// `node` plus up to `max_ancestors` ancestors, innermost first
    pub fn selection_path(&self, node: H::Node) -> Vec<H::Node> {
        selection_path(self.host, node, self.config.max_ancestors)
    }

    /// Readable path string from `<body>` down to `node`
    pub fn element_path(&self, node: H::Node) -> String {
        element_path(self.host, node, &self.config)
    }

    /// Override rules in `document` that target `node`
    pub fn matching_override_rules(&self, node: H::Node, document: &str) -> Vec<OverrideRule> {
        matching_override_rules(self.host, node, document)
    }

    fn collect_usages(&self, text: &str, names: &mut BTreeSet<String>) {
        for caps in var_usage_re().captures_iter(text) {
            let name = &caps[1];
            if self.config.is_tracked(name) {
                names.insert(name.to_string());
            }
        }
    }

    /// Rules of every sheet the host lets us read
    fn readable_rules(&self) -> Vec<StyleRule> {
        let mut rules = Vec::new();
        for index in 0..self.host.sheet_count() {
            match self.host.sheet_rules(index) {
                Ok(sheet) => rules.extend(sheet),
                Err(err) => debug!(sheet = index, error = %err, "skipping stylesheet"),
            }
        }
        rules
    }
}

/// Static selector match that tolerates interaction-state selectors.
///
/// A selector the host rejects is retried once with its pseudo-classes
/// stripped (`.btn:hover::after` becomes `.btn::after`). Anything still
/// rejected does not match.
pub fn selector_matches<T: StyleTree + ?Sized>(tree: &T, node: T::Node, selector: &str) -> bool {
    match tree.matches(node, selector) {
        Ok(matched) => matched,
        Err(err) => {
            let stripped = strip_pseudo_classes(selector);
            debug!(selector, stripped = %stripped, error = %err, "retrying selector without pseudo-classes");
            if stripped.is_empty() || stripped == selector.trim() {
                return false;
            }
            tree.matches(node, &stripped).unwrap_or(false)
        }
    }
}

/// `node` followed by up to `max_ancestors` of its ancestors, nearest first
pub fn selection_path<T: StyleTree + ?Sized>(
    tree: &T,
    node: T::Node,
    max_ancestors: usize,
) -> Vec<T::Node> {
    let mut path = vec![node];
    path.extend(ancestors(tree, node).into_iter().take(max_ancestors));
    path
}

/// Build a `body`-relative path such as `#app > .card.featured > div:nth-of-type(2)`.
///
/// Walking up from `node`, each level contributes an id selector (which ends
/// the walk), else up to two non-framework classes, else its tag name with an
/// `:nth-of-type` index when it has same-tag siblings.
pub fn element_path<T: StyleTree + ?Sized>(
    tree: &T,
    node: T::Node,
    config: &ResolverConfig,
) -> String {
    let mut parts = Vec::new();
    let mut current = Some(node);

    while let Some(element) = current {
        let tag = tree.tag_name(element);
        if tag == "body" || tag == "html" {
            break;
        }

        if let Some(id) = tree.id(element) {
            parts.push(format!("#{id}"));
            break;
        }

        let classes: Vec<&str> = tree
            .classes(element)
            .into_iter()
            .filter(|c| !config.is_framework_class(c))
            .take(2)
            .collect();

        if !classes.is_empty() {
            parts.push(format!(".{}", classes.join(".")));
        } else {
            parts.push(tag_with_index(tree, element));
        }

        current = tree.parent(element);
    }

    if parts.is_empty() {
        return tree.tag_name(node).to_string();
    }
    parts.reverse();
    parts.join(" > ")
}

fn tag_with_index<T: StyleTree + ?Sized>(tree: &T, node: T::Node) -> String {
    let tag = tree.tag_name(node);
    let Some(parent) = tree.parent(node) else {
        return tag.to_string();
    };
    let same_tag: Vec<_> = tree
        .children(parent)
        .into_iter()
        .filter(|&s| tree.tag_name(s) == tag)
        .collect();
    if same_tag.len() < 2 {
        return tag.to_string();
    }
    match same_tag.iter().position(|&s| s == node) {
        Some(index) => format!("{tag}:nth-of-type({})", index + 1),
        None => tag.to_string(),
    }
}

/// Override rules in `document` whose selector targets `node`
pub fn matching_override_rules<T: StyleTree + ?Sized>(
    tree: &T,
    node: T::Node,
    document: &str,
) -> Vec<OverrideRule> {
    overrides::override_rules(document)
        .into_iter()
        .filter(|rule| selector_matches(tree, node, &rule.selector))
        .collect()
}

fn inline_value(inline: &str, name: &str) -> Option<String> {
    parse_declarations(inline)
        .filter(|(n, _)| *n == name)
        .map(|(_, v)| v.to_string())
        .last()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
