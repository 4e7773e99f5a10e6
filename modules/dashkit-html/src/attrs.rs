//! Helpers for conditional attribute markup.
//!
//! Attribute names are `'static` like literal segments; attribute values
//! are rendered through [`Render`] and therefore escaped.

use crate::builder::{Render, TemplateBuilder};
use crate::fragment::SafeFragment;

/// ` name="value"` with the value escaped.
pub fn attr<T: Render + ?Sized>(name: &'static str, value: &T) -> SafeFragment {
    let mut builder = TemplateBuilder::new();
    builder
        .literal(" ")
        .literal(name)
        .literal("=\"")
        .push(value)
        .literal("\"");
    builder.finish()
}

/// ` name="value"` when `value` is present, nothing otherwise.
pub fn attr_opt<T: Render + ?Sized>(name: &'static str, value: Option<&T>) -> SafeFragment {
    match value {
        Some(value) => attr(name, value),
        None => SafeFragment::empty(),
    }
}

/// Boolean attribute (` disabled`, ` open`) when `on`, nothing otherwise.
pub fn flag(name: &'static str, on: bool) -> SafeFragment {
    let mut builder = TemplateBuilder::new();
    if on {
        builder.literal(" ").literal(name);
    }
    builder.finish()
}

/// Space-separated class names whose condition holds.
pub fn class_list(classes: &[(&'static str, bool)]) -> SafeFragment {
    let mut builder = TemplateBuilder::new();
    let mut first = true;
    for &(name, on) in classes {
        if !on {
            continue;
        }
        if !first {
            builder.literal(" ");
        }
        builder.literal(name);
        first = false;
    }
    builder.finish()
}
