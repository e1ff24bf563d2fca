//! Tint Theme Engine
//!
//! Treats a CSS custom-property sheet as structured, round-trippable state.
//!
//! # Overview
//!
//! A theme document is a canonical `:root { ... }` block covering a fixed
//! variable schema, optionally followed by an override region introduced by
//! `/* AI Fine-Tune Overrides */`. The engine provides:
//!
//! - **Color codec**: `#rrggbb` to and from the `R G B` triples stored in
//!   `--oui-color-*` variables
//! - **Variable store**: scan a document into a [`VariableMap`] and write the
//!   canonical block back out with defaults filled in
//! - **Override regions**: extract, upsert, and delete rules in the trailing
//!   region without touching the canonical block
//! - **Scope resolution**: report which variables and override rules are in
//!   effect for an element of a host-provided tree
//! - **Editor session**: a stateful wrapper for UI code that applies single
//!   edits while preserving overrides
//!
//! # Quick Start
//!
//! ```rust
//! use tint_theme::ThemeSession;
//!
//! let mut session = ThemeSession::default();
//! session.update_color("primary", "#ff8040");
//! session.upsert_override(".btn", "border-radius: 0");
//!
//! assert!(session.css().contains("--oui-color-primary: 255 128 64;"));
//! assert_eq!(session.override_rules().len(), 1);
//! ```
//!
//! # Hosts
//!
//! Scope resolution needs a styling engine. Hosts implement the traits in
//! [`dom`]; [`DomSnapshot`] is an in-memory implementation for static pages.
//!
//! Nothing in this crate performs I/O. Persisting documents is up to callers.

pub mod color;
pub mod dom;
pub mod error;
pub mod overrides;
pub mod resolver;
pub mod schema;
pub mod selector;
pub mod session;
pub mod stylesheet;
pub mod variables;

// Re-export commonly used types
pub use color::{hex_to_rgb_triple, rgb_triple_to_hex, Rgb};
pub use dom::{ComputedStyleProvider, DomSnapshot, NodeId, StyleRuleEnumerator, StyleTree};
pub use error::{SelectorError, SheetAccessError, SnapshotError};
pub use overrides::{ExtractedOverrides, OverrideRule, OVERRIDE_MARKER};
pub use resolver::{ElementCssVariable, ResolverConfig, ScopeResolver};
pub use schema::{SchemaEntry, VariableFamily};
pub use selector::{strip_pseudo_classes, SelectorList};
pub use session::ThemeSession;
pub use stylesheet::StyleRule;
pub use variables::VariableMap;
