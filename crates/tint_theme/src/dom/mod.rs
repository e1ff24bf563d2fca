//! Host capability interfaces
//!
//! The scope resolver needs a live styling engine: an element tree, the
//! cascade's computed values, and the page's stylesheet rules. Hosts provide
//! these through three traits:
//!
//! - [`StyleTree`] - element structure and attributes, plus `matches`
//! - [`ComputedStyleProvider`] - what the cascade resolved for a property
//! - [`StyleRuleEnumerator`] - the rules of every stylesheet, where readable
//!
//! [`DomSnapshot`] implements all three over an in-memory tree loaded from
//! JSON, for tooling and tests.
//!
//! # Example
//!
//! ```rust
//! use tint_theme::dom::{DomSnapshot, StyleTree};
//!
//! let mut dom = DomSnapshot::new();
//! let body = dom.append_element(dom.document_element(), "body");
//! let button = dom.append_element(body, "button");
//! dom.set_attribute(button, "class", "btn primary");
//!
//! assert!(dom.matches(button, "body > .btn").unwrap());
//! assert_eq!(dom.classes(button), vec!["btn", "primary"]);
//! ```

mod snapshot;

use std::fmt::Debug;
use std::hash::Hash;

pub use snapshot::{DomSnapshot, NodeId};

use crate::error::{SelectorError, SheetAccessError};
use crate::selector::SelectorList;
use crate::stylesheet::StyleRule;

/// Read access to an element tree
pub trait StyleTree {
    /// Element handle
    type Node: Copy + Eq + Hash + Debug;

    /// The `<html>` element
    fn document_element(&self) -> Self::Node;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Element children in document order
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Lowercase tag name
    fn tag_name(&self, node: Self::Node) -> &str;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    fn id(&self, node: Self::Node) -> Option<&str> {
        self.attribute(node, "id").filter(|id| !id.is_empty())
    }

    fn classes(&self, node: Self::Node) -> Vec<&str> {
        self.attribute(node, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Text of the element's `style` attribute
    fn inline_style(&self, node: Self::Node) -> &str {
        self.attribute(node, "style").unwrap_or("")
    }

    /// Test `node` against selector text.
    ///
    /// Hosts with a native selector engine should override this.
    fn matches(&self, node: Self::Node, selector: &str) -> Result<bool, SelectorError> {
        Ok(SelectorList::parse(selector)?.matches(self, node))
    }
}

/// The platform cascade
pub trait ComputedStyleProvider: StyleTree {
    /// Resolved value of `property` (e.g. `--oui-color-primary`) on `node`.
    ///
    /// `None` or an empty string both mean "not set".
    fn computed_property(&self, node: Self::Node, property: &str) -> Option<String>;
}

/// Stylesheet rule enumeration
pub trait StyleRuleEnumerator {
    fn sheet_count(&self) -> usize;

    /// Rules of the sheet at `index`; inaccessible sheets return an error
    fn sheet_rules(&self, index: usize) -> Result<Vec<StyleRule>, SheetAccessError>;
}

/// Ancestors of `node`, nearest first
pub fn ancestors<T: StyleTree + ?Sized>(tree: &T, node: T::Node) -> Vec<T::Node> {
    let mut out = Vec::new();
    let mut current = tree.parent(node);
    while let Some(parent) = current {
        out.push(parent);
        current = tree.parent(parent);
    }
    out
}

/// Descendants of `node` in document order, `node` excluded
pub fn descendants<T: StyleTree + ?Sized>(tree: &T, node: T::Node) -> Vec<T::Node> {
    let mut out = Vec::new();
    let mut stack: Vec<T::Node> = tree.children(node).into_iter().rev().collect();
    while let Some(next) = stack.pop() {
        out.push(next);
        stack.extend(tree.children(next).into_iter().rev());
    }
    out
}
