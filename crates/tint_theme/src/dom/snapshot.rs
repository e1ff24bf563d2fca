//! In-memory element tree
//!
//! A static page capture: elements with attributes, plus the stylesheets that
//! applied to them. The cascade is modelled for reading custom properties only:
//! inline declarations beat stylesheet rules, rules are ranked by specificity
//! then source order, and `--*` properties inherit from the nearest ancestor
//! that declares them. Stateful selectors (`:hover`, ...) never apply.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use super::{descendants, ComputedStyleProvider, StyleRuleEnumerator, StyleTree};
use crate::error::{SelectorError, SheetAccessError, SnapshotError};
use crate::selector::{SelectorList, Specificity};
use crate::stylesheet::{self, parse_declarations, StyleRule};

new_key_type! {
    /// Element handle in a [`DomSnapshot`]
    pub struct NodeId;
}

#[derive(Clone, Debug)]
struct Element {
    tag: String,
    attributes: FxHashMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: FxHashMap::default(),
            parent,
            children: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
struct Sheet {
    href: Option<String>,
    cross_origin: bool,
    rules: Vec<CompiledRule>,
}

#[derive(Clone, Debug)]
struct CompiledRule {
    rule: StyleRule,
    /// `None` when the selector cannot be matched statically
    selectors: Option<SelectorList>,
}

/// Element tree plus stylesheets, with the `<html>` element as root
#[derive(Clone, Debug)]
pub struct DomSnapshot {
    nodes: SlotMap<NodeId, Element>,
    root: NodeId,
    sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct SnapshotDoc {
    root: ElementDoc,
    #[serde(default)]
    stylesheets: Vec<SheetDoc>,
}

#[derive(Deserialize)]
struct ElementDoc {
    tag: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    classes: Vec<String>,
    #[serde(default)]
    attributes: FxHashMap<String, String>,
    #[serde(default)]
    style: Option<String>,
    #[serde(default)]
    children: Vec<ElementDoc>,
}

#[derive(Deserialize)]
struct SheetDoc {
    #[serde(default)]
    href: Option<String>,
    #[serde(default)]
    cross_origin: bool,
    #[serde(default)]
    css: String,
}

impl Default for DomSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl DomSnapshot {
    /// Empty document containing only `<html>`
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Element::new("html", None));
        Self {
            nodes,
            root,
            sheets: Vec::new(),
        }
    }

    /// Load a snapshot from JSON.
    ///
    /// ```json
    /// {
    ///   "root": {"tag": "html", "children": [
    ///     {"tag": "body", "children": [
    ///       {"tag": "div", "id": "app", "classes": ["shell"],
    ///        "style": "--oui-rounded: 2px", "attributes": {"data-x": "1"}}
    ///     ]}
    ///   ]},
    ///   "stylesheets": [{"href": "theme.css", "css": ":root { ... }"}]
    /// }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let doc: SnapshotDoc = serde_json::from_str(json)?;
        if !doc.root.tag.eq_ignore_ascii_case("html") {
            return Err(SnapshotError::UnexpectedRoot(doc.root.tag));
        }

        let mut snapshot = Self::new();
        let root = snapshot.root;
        snapshot.apply_element_doc(root, &doc.root);

        for sheet in &doc.stylesheets {
            snapshot.push_sheet(sheet.href.clone(), sheet.cross_origin, &sheet.css);
        }

        trace!(
            nodes = snapshot.nodes.len(),
            sheets = snapshot.sheets.len(),
            "loaded DOM snapshot"
        );
        Ok(snapshot)
    }

    fn apply_element_doc(&mut self, node: NodeId, doc: &ElementDoc) {
        for (name, value) in &doc.attributes {
            self.set_attribute(node, name, value.as_str());
        }
        if let Some(id) = &doc.id {
            self.set_attribute(node, "id", id.as_str());
        }
        if !doc.classes.is_empty() {
            self.set_attribute(node, "class", doc.classes.join(" "));
        }
        if let Some(style) = &doc.style {
            self.set_attribute(node, "style", style.as_str());
        }
        for child in &doc.children {
            let id = self.append_element(node, &child.tag);
            self.apply_element_doc(id, child);
        }
    }

    /// Append a new element as the last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.nodes.insert(Element::new(tag, Some(parent)));
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.push(id);
        }
        id
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.nodes.get_mut(node) {
            element
                .attributes
                .insert(name.to_ascii_lowercase(), value.into());
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Option<String> {
        self.nodes
            .get_mut(node)
            .and_then(|e| e.attributes.remove(&name.to_ascii_lowercase()))
    }

    /// Add a readable stylesheet
    pub fn add_stylesheet(&mut self, href: Option<&str>, css: &str) {
        self.push_sheet(href.map(str::to_string), false, css);
    }

    /// Add a stylesheet that applies to the page but cannot be enumerated
    pub fn add_cross_origin_stylesheet(&mut self, href: &str, css: &str) {
        self.push_sheet(Some(href.to_string()), true, css);
    }

    fn push_sheet(&mut self, href: Option<String>, cross_origin: bool, css: &str) {
        let rules = stylesheet::parse_rules(css)
            .into_iter()
            .map(|rule| {
                let selectors = SelectorList::parse(&rule.selector_text).ok();
                CompiledRule { rule, selectors }
            })
            .collect();
        self.sheets.push(Sheet {
            href,
            cross_origin,
            rules,
        });
    }

    /// The `<body>` element, if present
    pub fn body(&self) -> Option<NodeId> {
        self.children(self.root)
            .into_iter()
            .find(|&c| self.tag_name(c) == "body")
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First element in document order matching `selector`, root included
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// Every element in document order matching `selector`, root included
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        let mut all = vec![self.root];
        all.extend(descendants(self, self.root));
        Ok(all
            .into_iter()
            .filter(|&node| list.matches(self, node))
            .collect())
    }

    /// Value declared for `property` on `node` itself
    fn declared_value(&self, node: NodeId, property: &str) -> Option<&str> {
        let inline = parse_declarations(self.inline_style(node))
            .filter(|(name, _)| *name == property)
            .map(|(_, value)| value)
            .last();
        if inline.is_some() {
            return inline;
        }

        let mut best: Option<((Specificity, usize), &str)> = None;
        let rules = self.sheets.iter().flat_map(|s| s.rules.iter());
        for (order, compiled) in rules.enumerate() {
            let Some(selectors) = &compiled.selectors else {
                continue;
            };
            let Some(value) = compiled.rule.property(property) else {
                continue;
            };
            let Some(specificity) = selectors.matching_specificity(self, node) else {
                continue;
            };
            let rank = (specificity, order);
            if best.map_or(true, |(current, _)| rank >= current) {
                best = Some((rank, value));
            }
        }
        best.map(|(_, value)| value)
    }
}

impl StyleTree for DomSnapshot {
    type Node = NodeId;

    fn document_element(&self) -> NodeId {
        self.root
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|e| e.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    fn tag_name(&self, node: NodeId) -> &str {
        self.nodes.get(node).map_or("", |e| e.tag.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        let element = self.nodes.get(node)?;
        match element.attributes.get(name) {
            Some(value) => Some(value.as_str()),
            None if name.bytes().any(|b| b.is_ascii_uppercase()) => element
                .attributes
                .get(&name.to_ascii_lowercase())
                .map(String::as_str),
            None => None,
        }
    }
}

impl ComputedStyleProvider for DomSnapshot {
    fn computed_property(&self, node: NodeId, property: &str) -> Option<String> {
        if !property.starts_with("--") {
            return self.declared_value(node, property).map(str::to_string);
        }

        let mut current = Some(node);
        while let Some(level) = current {
            if let Some(value) = self.declared_value(level, property) {
                return Some(value.to_string());
            }
            current = self.parent(level);
        }
        None
    }
}

impl StyleRuleEnumerator for DomSnapshot {
    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn sheet_rules(&self, index: usize) -> Result<Vec<StyleRule>, SheetAccessError> {
        let sheet = self
            .sheets
            .get(index)
            .ok_or_else(|| SheetAccessError::Unavailable(format!("no stylesheet at index {index}")))?;
        if sheet.cross_origin {
            let href = sheet.href.clone().unwrap_or_else(|| "<inline>".to_string());
            return Err(SheetAccessError::CrossOrigin(href));
        }
        Ok(sheet.rules.iter().map(|c| c.rule.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"{
        "root": {"tag": "html", "children": [
            {"tag": "body", "children": [
                {"tag": "div", "id": "app", "style": "--oui-rounded: 2px", "children": [
                    {"tag": "button", "classes": ["btn", "primary"]},
                    {"tag": "P", "classes": ["note"]}
                ]}
            ]}
        ]},
        "stylesheets": [
            {"href": "theme.css", "css": ":root { --oui-rounded: 4px; --oui-color-primary: 1 2 3; } .btn { --oui-color-primary: 9 9 9; } .btn:hover { --oui-color-primary: 0 0 0; }"},
            {"href": "https://cdn.example.com/x.css", "cross_origin": true, "css": ".primary { --oui-gap: 3px; }"}
        ]
    }"#;

    #[test]
    fn test_from_json_builds_tree() {
        let dom = DomSnapshot::from_json(PAGE).unwrap();
        assert_eq!(dom.len(), 5);
        let body = dom.body().unwrap();
        assert_eq!(dom.tag_name(body), "body");
        let app = dom.query_selector("#app").unwrap().unwrap();
        assert_eq!(dom.parent(app), Some(body));
        assert_eq!(dom.children(app).len(), 2);
        assert_eq!(dom.inline_style(app), "--oui-rounded: 2px");
        assert!(dom.query_selector("p.note").unwrap().is_some());
    }

    #[test]
    fn test_rejects_non_html_root() {
        let err = DomSnapshot::from_json(r#"{"root": {"tag": "body"}}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::UnexpectedRoot(tag) if tag == "body"));
        assert!(matches!(
            DomSnapshot::from_json("{"),
            Err(SnapshotError::Decode(_))
        ));
    }

    #[test]
    fn test_query_selector_all_includes_root() {
        let dom = DomSnapshot::from_json(PAGE).unwrap();
        assert_eq!(dom.query_selector_all("*").unwrap().len(), 5);
        assert_eq!(dom.query_selector(":root").unwrap(), Some(dom.document_element()));
        assert!(dom.query_selector(".btn:hover").is_err());
    }

    #[test]
    fn test_computed_custom_property_inherits() {
        let dom = DomSnapshot::from_json(PAGE).unwrap();
        let button = dom.query_selector("button").unwrap().unwrap();
        let note = dom.query_selector(".note").unwrap().unwrap();
        // Inline on #app beats :root
        assert_eq!(
            dom.computed_property(button, "--oui-rounded").as_deref(),
            Some("2px")
        );
        // Own rule beats inherited; :hover rule never applies
        assert_eq!(
            dom.computed_property(button, "--oui-color-primary").as_deref(),
            Some("9 9 9")
        );
        assert_eq!(
            dom.computed_property(note, "--oui-color-primary").as_deref(),
            Some("1 2 3")
        );
        // Cross-origin sheets still cascade
        assert_eq!(
            dom.computed_property(button, "--oui-gap").as_deref(),
            Some("3px")
        );
        assert_eq!(dom.computed_property(note, "--oui-missing"), None);
    }

    #[test]
    fn test_specificity_then_source_order() {
        let mut dom = DomSnapshot::new();
        let body = dom.append_element(dom.document_element(), "body");
        let el = dom.append_element(body, "div");
        dom.set_attribute(el, "id", "x");
        dom.set_attribute(el, "class", "a");
        dom.add_stylesheet(None, "#x { --v: id; } .a { --v: class; }");
        assert_eq!(dom.computed_property(el, "--v").as_deref(), Some("id"));

        dom.add_stylesheet(None, "div.a { --w: first; } .a.a { --w: second; }");
        assert_eq!(dom.computed_property(el, "--w").as_deref(), Some("second"));
    }

    #[test]
    fn test_sheet_access() {
        let dom = DomSnapshot::from_json(PAGE).unwrap();
        assert_eq!(dom.sheet_count(), 2);
        assert_eq!(dom.sheet_rules(0).unwrap().len(), 3);
        assert_eq!(
            dom.sheet_rules(1),
            Err(SheetAccessError::CrossOrigin(
                "https://cdn.example.com/x.css".to_string()
            ))
        );
        assert!(matches!(
            dom.sheet_rules(7),
            Err(SheetAccessError::Unavailable(_))
        ));
    }

    #[test]
    fn test_attribute_edits() {
        let mut dom = DomSnapshot::new();
        let root = dom.document_element();
        dom.set_attribute(root, "data-Theme", "dark");
        assert_eq!(dom.attribute(root, "data-theme"), Some("dark"));
        assert_eq!(dom.remove_attribute(root, "data-theme").as_deref(), Some("dark"));
        assert_eq!(dom.attribute(root, "data-theme"), None);
    }
}
