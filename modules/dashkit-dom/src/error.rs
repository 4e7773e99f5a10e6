//! Typed errors for document operations.

use thiserror::Error;

/// Errors raised while querying or mutating a [`crate::Document`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    /// CSS selector failed to parse
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Handle refers to a node that is no longer attached to the document
    #[error("element is no longer attached to the document")]
    Detached,

    /// Mount point for the application is missing
    #[error("mount point not found: {0}")]
    MissingRoot(String),

    /// Attributes could not be rewritten for this element
    #[error("cannot rewrite attributes of <{0}>")]
    AttributeRewrite(String),
}

/// Result type alias for document operations.
pub type DomResult<T> = std::result::Result<T, DomError>;
