//! Layout chrome wrapped around every page.

use dashkit_html::{attr, class_list, html, SafeFragment};

use crate::params::{Location, NavParams};
use crate::registry::{Layout, PageRegistry};

/// Every shell has exactly one element matching this selector; pages
/// render into it.
pub const CONTENT_SLOT: &str = "#page-content";

/// Render the shell for `active` with `placeholder` in the content slot.
pub fn render_shell(
    layout: Layout,
    registry: &PageRegistry,
    app_name: &str,
    active: &str,
    placeholder: &SafeFragment,
) -> SafeFragment {
    match layout {
        Layout::Dashboard => html!(
            "<div class=\"shell shell-dashboard\">"
            "<aside class=\"sidebar\">"
            "<div class=\"brand\">" {app_name} "</div>"
            {nav(registry, active)}
            "</aside>"
            "<main id=\"page-content\" class=\"content\">" {placeholder} "</main>"
            "</div>"
        ),
        Layout::Standalone => html!(
            "<div class=\"shell shell-standalone\">"
            "<main id=\"page-content\" class=\"content\">" {placeholder} "</main>"
            "</div>"
        ),
    }
}

fn nav(registry: &PageRegistry, active: &str) -> SafeFragment {
    let items: Vec<SafeFragment> = registry
        .iter()
        .filter(|(_, entry)| entry.nav && entry.layout == Layout::Dashboard)
        .map(|(key, entry)| {
            let href = Location::new(key, NavParams::new()).to_href();
            let current = key == active;
            html!(
                "<li><a"
                {attr("href", &href)}
                " class=\"" {class_list(&[("nav-link", true), ("active", current)])} "\""
                {attr("data-route", key)}
                {if current { attr("aria-current", "page") } else { SafeFragment::empty() }}
                ">" {entry.title.as_str()} "</a></li>"
            )
        })
        .collect();
    html!("<nav><ul class=\"nav\">" {items} "</ul></nav>")
}
