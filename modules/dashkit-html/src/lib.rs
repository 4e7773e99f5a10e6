//! Safe HTML templating.
//!
//! Markup is assembled from `&'static str` literal segments and dynamic
//! values. Dynamic values are escaped exactly once; [`SafeFragment`]s are
//! inserted verbatim, so fragments nest without double-escaping.
//!
//! ```
//! use dashkit_html::html;
//!
//! let name = "Tom & Jerry";
//! let inner = html!("<b>" {name} "</b>");
//! let outer = html!("<p>" {inner} "</p>");
//! assert_eq!(outer.as_str(), "<p><b>Tom &amp; Jerry</b></p>");
//! ```

pub mod attrs;
pub mod builder;
pub mod escape;
pub mod fragment;

pub use attrs::{attr, attr_opt, class_list, flag};
pub use builder::{html, Render, TemplateBuilder, TemplateValue};
pub use escape::{escape, escape_into, is_escaped};
pub use fragment::{trust_html, SafeFragment};

/// Build a [`SafeFragment`] from string literals and `{expr}` splices.
///
/// String literals are appended verbatim; every `{expr}` is rendered
/// through [`Render`] (escaped unless it is a fragment).
///
/// ```
/// use dashkit_html::html;
///
/// let rows = vec![html!("<li>" {1} "</li>"), html!("<li>" {"<2>"} "</li>")];
/// assert_eq!(
///     html!("<ul>" {rows} "</ul>").as_str(),
///     "<ul><li>1</li><li>&lt;2&gt;</li></ul>"
/// );
/// ```
#[macro_export]
macro_rules! html {
    () => {
        $crate::SafeFragment::empty()
    };
    ($($item:tt)+) => {{
        let mut __builder = $crate::TemplateBuilder::new();
        $( $crate::__html_item!(__builder, $item); )+
        __builder.finish()
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __html_item {
    ($builder:ident, { $value:expr }) => {
        $builder.push(&$value)
    };
    ($builder:ident, $segment:literal) => {
        $builder.literal($segment)
    };
}
