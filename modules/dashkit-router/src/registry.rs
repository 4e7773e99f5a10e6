//! The page registry: route key -> title and layout.
//!
//! Built once at startup, read-only afterwards. Declaration order is kept
//! for navigation chrome.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RouterError, RouterResult};

/// Which shell wraps a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Sidebar navigation chrome around the content slot.
    Dashboard,
    /// Bare content slot (login, not-found).
    Standalone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub title: String,
    pub layout: Layout,
    /// Listed in the dashboard sidebar.
    pub nav: bool,
}

/// One `[[routes]]` row of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDef {
    pub key: String,
    pub title: String,
    pub layout: Layout,
    #[serde(default = "listed")]
    pub nav: bool,
}

fn listed() -> bool {
    true
}

#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    keys: Vec<String>,
    entries: HashMap<String, RouteEntry>,
}

impl PageRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn from_defs(defs: impl IntoIterator<Item = RouteDef>) -> RouterResult<Self> {
        defs.into_iter()
            .fold(Self::builder(), |builder, def| {
                builder.entry(
                    def.key,
                    RouteEntry {
                        title: def.title,
                        layout: def.layout,
                        nav: def.nav,
                    },
                )
            })
            .build()
    }

    pub fn get(&self, key: &str) -> Option<&RouteEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteEntry)> {
        self.keys
            .iter()
            .filter_map(|key| self.entries.get(key).map(|entry| (key.as_str(), entry)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    routes: Vec<(String, RouteEntry)>,
}

impl RegistryBuilder {
    pub fn route(self, key: impl Into<String>, title: impl Into<String>, layout: Layout) -> Self {
        self.entry(
            key,
            RouteEntry {
                title: title.into(),
                layout,
                nav: true,
            },
        )
    }

    /// A route left out of the sidebar, e.g. a detail page that needs params.
    pub fn hidden(self, key: impl Into<String>, title: impl Into<String>, layout: Layout) -> Self {
        self.entry(
            key,
            RouteEntry {
                title: title.into(),
                layout,
                nav: false,
            },
        )
    }

    pub fn entry(mut self, key: impl Into<String>, entry: RouteEntry) -> Self {
        self.routes.push((key.into(), entry));
        self
    }

    pub fn build(self) -> RouterResult<PageRegistry> {
        let mut registry = PageRegistry::default();
        for (key, entry) in self.routes {
            if !is_route_key(&key) {
                return Err(RouterError::InvalidRouteKey(key));
            }
            if registry.entries.contains_key(&key) {
                return Err(RouterError::DuplicateRoute(key));
            }
            registry.keys.push(key.clone());
            registry.entries.insert(key, entry);
        }
        Ok(registry)
    }
}

/// Kebab-case: lowercase ASCII letters and digits in `-`-separated runs.
pub fn is_route_key(key: &str) -> bool {
    !key.is_empty()
        && key.split('-').all(|part| {
            !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}
