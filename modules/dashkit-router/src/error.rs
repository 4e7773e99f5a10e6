//! Typed errors for registry construction and navigation.

use dashkit_dom::DomError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    /// Route key is not in the page registry
    #[error("unknown route: {0}")]
    UnknownRoute(String),

    /// Route key is not kebab-case
    #[error("invalid route key {0:?}: expected kebab-case")]
    InvalidRouteKey(String),

    /// Route key registered twice
    #[error("duplicate route: {0}")]
    DuplicateRoute(String),

    /// Registered route without a page module
    #[error("no page module for route: {0}")]
    MissingModule(String),

    /// Page module for a route the registry does not know
    #[error("page module registered for unknown route: {0}")]
    UnregisteredModule(String),

    /// Navigator outlived the router it points at
    #[error("router has been dropped")]
    Dropped,

    /// Document operation failed while composing a page
    #[error("document error: {0}")]
    Dom(#[from] DomError),
}

/// Result type alias for router operations.
pub type RouterResult<T> = std::result::Result<T, RouterError>;
