//! Engine error types

use thiserror::Error;

/// Selector parsing and static-matching failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Selector text was empty (or became empty after stripping)
    #[error("empty selector")]
    Empty,

    /// Input could not be parsed as a selector
    #[error("invalid selector '{selector}' near '{near}'")]
    Syntax { selector: String, near: String },

    /// Pseudo-class the engine does not know about
    #[error("unknown pseudo-class ':{0}'")]
    UnknownPseudoClass(String),

    /// Pseudo-class tied to an interaction state (`:hover`, `:focus`, ...)
    /// that cannot be evaluated by a static match
    #[error("pseudo-class ':{0}' depends on interaction state")]
    StatefulPseudoClass(String),
}

/// A stylesheet whose rules cannot be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetAccessError {
    /// Rules of a cross-origin sheet are not exposed to the host
    #[error("stylesheet {0} is cross-origin")]
    CrossOrigin(String),

    /// Any other host-specific access failure
    #[error("stylesheet unavailable: {0}")]
    Unavailable(String),
}

/// DOM snapshot loading errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The snapshot root must be the `<html>` element
    #[error("snapshot root must be <html>, found <{0}>")]
    UnexpectedRoot(String),
}
