//! Live document tree: commit safe fragments, query elements, dispatch events.

pub mod document;
pub mod dom;
pub mod error;

pub use document::{Document, Element, Event, Handler};
pub use dom::Dom;
pub use error::{DomError, DomResult};
