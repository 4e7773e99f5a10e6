//! Template composition.
//!
//! Literal segments are `&'static str`: they are authored markup and go in
//! verbatim. Everything else goes through [`Render`], which escapes raw
//! values, flattens sequences and inserts [`SafeFragment`]s untouched.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::escape::{escape_into, format_float};
use crate::fragment::SafeFragment;

/// A value that can fill a template slot.
pub trait Render {
    fn render_to(&self, out: &mut String);
}

impl Render for str {
    fn render_to(&self, out: &mut String) {
        escape_into(out, self);
    }
}

impl Render for String {
    fn render_to(&self, out: &mut String) {
        escape_into(out, self);
    }
}

impl Render for Cow<'_, str> {
    fn render_to(&self, out: &mut String) {
        escape_into(out, self);
    }
}

impl Render for char {
    fn render_to(&self, out: &mut String) {
        let mut buf = [0u8; 4];
        escape_into(out, self.encode_utf8(&mut buf));
    }
}

impl Render for bool {
    fn render_to(&self, out: &mut String) {
        out.push_str(if *self { "true" } else { "false" });
    }
}

macro_rules! impl_render_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Render for $ty {
                fn render_to(&self, out: &mut String) {
                    // Writing into a String cannot fail.
                    let _ = write!(out, "{self}");
                }
            }
        )*
    };
}

impl_render_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Render for f64 {
    fn render_to(&self, out: &mut String) {
        out.push_str(&format_float(*self));
    }
}

impl Render for f32 {
    fn render_to(&self, out: &mut String) {
        out.push_str(&format_float(f64::from(*self)));
    }
}

impl<T: Render> Render for Option<T> {
    fn render_to(&self, out: &mut String) {
        if let Some(value) = self {
            value.render_to(out);
        }
    }
}

impl Render for SafeFragment {
    fn render_to(&self, out: &mut String) {
        out.push_str(self.as_str());
    }
}

impl<T: Render> Render for [T] {
    fn render_to(&self, out: &mut String) {
        for item in self {
            item.render_to(out);
        }
    }
}

impl<T: Render, const N: usize> Render for [T; N] {
    fn render_to(&self, out: &mut String) {
        self.as_slice().render_to(out);
    }
}

impl<T: Render> Render for Vec<T> {
    fn render_to(&self, out: &mut String) {
        self.as_slice().render_to(out);
    }
}

impl<T: Render + ?Sized> Render for &T {
    fn render_to(&self, out: &mut String) {
        (**self).render_to(out);
    }
}

impl<T: Render + ?Sized> Render for Box<T> {
    fn render_to(&self, out: &mut String) {
        (**self).render_to(out);
    }
}

/// Dynamically typed template value, for slots whose type is only known at
/// runtime (decoded records, heterogeneous lists).
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Fragment(SafeFragment),
    List(Vec<TemplateValue>),
}

impl Render for TemplateValue {
    fn render_to(&self, out: &mut String) {
        match self {
            TemplateValue::Text(text) => text.render_to(out),
            TemplateValue::Int(n) => n.render_to(out),
            TemplateValue::Float(n) => n.render_to(out),
            TemplateValue::Bool(b) => b.render_to(out),
            TemplateValue::Null => {}
            TemplateValue::Fragment(fragment) => fragment.render_to(out),
            TemplateValue::List(items) => items.render_to(out),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::Text(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::Text(value)
    }
}

impl From<i64> for TemplateValue {
    fn from(value: i64) -> Self {
        TemplateValue::Int(value)
    }
}

impl From<i32> for TemplateValue {
    fn from(value: i32) -> Self {
        TemplateValue::Int(i64::from(value))
    }
}

impl From<u32> for TemplateValue {
    fn from(value: u32) -> Self {
        TemplateValue::Int(i64::from(value))
    }
}

impl From<f64> for TemplateValue {
    fn from(value: f64) -> Self {
        TemplateValue::Float(value)
    }
}

impl From<bool> for TemplateValue {
    fn from(value: bool) -> Self {
        TemplateValue::Bool(value)
    }
}

impl From<SafeFragment> for TemplateValue {
    fn from(value: SafeFragment) -> Self {
        TemplateValue::Fragment(value)
    }
}

impl<T: Into<TemplateValue>> From<Option<T>> for TemplateValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(TemplateValue::Null, Into::into)
    }
}

impl<T: Into<TemplateValue>> From<Vec<T>> for TemplateValue {
    fn from(value: Vec<T>) -> Self {
        TemplateValue::List(value.into_iter().map(Into::into).collect())
    }
}

/// Accumulates literal segments and rendered values into one fragment.
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    buf: String,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    /// Append authored markup verbatim.
    pub fn literal(&mut self, segment: &'static str) -> &mut Self {
        self.buf.push_str(segment);
        self
    }

    /// Append a value: escaped, flattened, or verbatim for fragments.
    pub fn push<T: Render + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.render_to(&mut self.buf);
        self
    }

    pub fn finish(self) -> SafeFragment {
        SafeFragment::from_rendered(self.buf)
    }
}

/// Tagged-template form: `segments[0] values[0] segments[1] ... segments[n]`.
///
/// Expects exactly one more segment than values. A mismatch is a bug in the
/// caller; debug builds assert, release builds append the leftovers in order.
pub fn html(segments: &[&'static str], values: &[&dyn Render]) -> SafeFragment {
    debug_assert_eq!(
        segments.len(),
        values.len() + 1,
        "template needs one more literal segment than values"
    );

    let mut builder = TemplateBuilder::with_capacity(segments.iter().map(|s| s.len()).sum());
    let mut values = values.iter();
    for &segment in segments {
        builder.literal(segment);
        if let Some(value) = values.next() {
            builder.push(*value);
        }
    }
    for value in values {
        builder.push(*value);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::trust_html;

    #[test]
    fn escapes_text_values() {
        let fragment = html(&["<p>", "</p>"], &[&"a < b"]);
        assert_eq!(fragment.as_str(), "<p>a &lt; b</p>");
    }

    #[test]
    fn renders_primitives() {
        let fragment = html(
            &["", " ", " ", " ", ""],
            &[&42u32, &-7i64, &true, &1.5f64],
        );
        assert_eq!(fragment.as_str(), "42 -7 true 1.5");
    }

    #[test]
    fn none_renders_empty() {
        let missing: Option<&str> = None;
        let fragment = html(&["[", "]"], &[&missing]);
        assert_eq!(fragment.as_str(), "[]");
    }

    #[test]
    fn nested_lists_flatten_depth_first() {
        let nested = vec![vec!["a", "<b>"], vec![], vec!["c"]];
        let fragment = html(&["", ""], &[&nested]);
        assert_eq!(fragment.as_str(), "a&lt;b&gt;c");
    }

    #[test]
    fn template_value_union() {
        let value = TemplateValue::List(vec![
            TemplateValue::from("x&y"),
            TemplateValue::from(3i64),
            TemplateValue::Null,
            TemplateValue::from(trust_html("<hr>")),
            TemplateValue::from(Some(false)),
            TemplateValue::from(None::<String>),
        ]);
        let fragment = html(&["", ""], &[&value]);
        assert_eq!(fragment.as_str(), "x&amp;y3<hr>false");
    }

    #[test]
    fn builder_chains() {
        let mut builder = TemplateBuilder::new();
        builder.literal("<td>").push(&'<').literal("</td>");
        assert_eq!(builder.finish().as_str(), "<td>&lt;</td>");
    }
}
