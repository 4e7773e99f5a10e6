//! Loading, error and empty-state fragments.
//!
//! Pure functions: same options, same markup. Error states carry a
//! `data-retry` button that page code wires up after committing.

use dashkit_html::{attr, html, SafeFragment};

use crate::icon::Icon;

/// Selector for the retry affordance inside an error state.
pub const RETRY_SELECTOR: &str = "[data-retry]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonKind {
    Cards,
    List,
    Table,
    Detail,
}

#[derive(Debug, Clone)]
pub struct SkeletonOptions {
    pub rows: usize,
    pub label: String,
}

impl Default for SkeletonOptions {
    fn default() -> Self {
        Self {
            rows: 3,
            label: "Loading".to_string(),
        }
    }
}

pub fn skeleton(kind: SkeletonKind, options: &SkeletonOptions) -> SafeFragment {
    let rows = options.rows.max(1);
    let body: SafeFragment = match kind {
        SkeletonKind::Cards => (0..rows)
            .map(|_| html!("<div class=\"skeleton-card\"><div class=\"skeleton-line wide\"></div><div class=\"skeleton-line\"></div></div>"))
            .collect(),
        SkeletonKind::List => (0..rows)
            .map(|_| html!("<div class=\"skeleton-row\"><div class=\"skeleton-dot\"></div><div class=\"skeleton-line\"></div></div>"))
            .collect(),
        SkeletonKind::Table => {
            let cells = html!("<td><div class=\"skeleton-line\"></div></td>");
            let rows: SafeFragment = (0..rows)
                .map(|_| html!("<tr>" {cells} {cells} {cells} "</tr>"))
                .collect();
            html!("<table class=\"skeleton-table\"><tbody>" {rows} "</tbody></table>")
        }
        SkeletonKind::Detail => html!(
            "<div class=\"skeleton-title\"></div>"
            "<div class=\"skeleton-line wide\"></div>"
            "<div class=\"skeleton-line\"></div>"
            "<div class=\"skeleton-block\"></div>"
        ),
    };

    let kind_class = match kind {
        SkeletonKind::Cards => "skeleton-cards",
        SkeletonKind::List => "skeleton-list",
        SkeletonKind::Table => "skeleton-table-wrap",
        SkeletonKind::Detail => "skeleton-detail",
    };

    html!(
        "<div class=\"skeleton " {kind_class} "\" aria-busy=\"true\"" {attr("aria-label", &options.label)} ">"
        {body}
        "</div>"
    )
}

#[derive(Debug, Clone)]
pub struct ErrorOptions {
    pub title: String,
    pub message: String,
    /// Label of the retry button; no button when `None`.
    pub retry_label: Option<String>,
}

impl Default for ErrorOptions {
    fn default() -> Self {
        Self {
            title: "Something went wrong".to_string(),
            message: "The data could not be loaded.".to_string(),
            retry_label: Some("Retry".to_string()),
        }
    }
}

impl ErrorOptions {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

pub fn error_state(options: &ErrorOptions) -> SafeFragment {
    let retry = options.retry_label.as_ref().map(|label| {
        html!("<button type=\"button\" class=\"btn btn-secondary\" data-retry>" {label} "</button>")
    });
    html!(
        "<div class=\"state state-error\" role=\"alert\">"
        {Icon::Alert.render()}
        "<h3>" {options.title} "</h3>"
        "<p>" {options.message} "</p>"
        {retry}
        "</div>"
    )
}

#[derive(Debug, Clone)]
pub struct EmptyOptions {
    pub icon: Icon,
    pub title: String,
    pub message: String,
}

impl Default for EmptyOptions {
    fn default() -> Self {
        Self {
            icon: Icon::Inbox,
            title: "Nothing here yet".to_string(),
            message: String::new(),
        }
    }
}

pub fn empty_state(options: &EmptyOptions) -> SafeFragment {
    let message = (!options.message.is_empty()).then(|| html!("<p>" {options.message} "</p>"));
    html!(
        "<div class=\"state state-empty\">"
        {options.icon.render()}
        "<h3>" {options.title} "</h3>"
        {message}
        "</div>"
    )
}
