//! Navigation parameters and the `#/<route>?<query>` location encoding.

use std::fmt;

use url::form_urlencoded;

/// String key/value pairs handed to a page. Values are never coerced.
///
/// Keys keep the position of their first appearance; a repeated key takes
/// the last value given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavParams {
    pairs: Vec<(String, String)>,
}

impl NavParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a form-urlencoded query string (no leading `?`).
    pub fn parse(query: &str) -> Self {
        form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NavParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = NavParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// A route key plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: String,
    pub params: NavParams,
}

impl Location {
    pub fn new(route: impl Into<String>, params: NavParams) -> Self {
        Self {
            route: route.into(),
            params,
        }
    }

    /// Parse `#/<route>?<query>`. The leading `#` and `/` are optional, so
    /// `projects?id=3` parses the same as `#/projects?id=3`.
    pub fn parse(href: &str) -> Self {
        let rest = href.strip_prefix('#').unwrap_or(href);
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        let (route, query) = rest.split_once('?').unwrap_or((rest, ""));
        let route = form_urlencoded::parse(format!("r={route}").as_bytes())
            .next()
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();
        Self {
            route,
            params: NavParams::parse(query),
        }
    }

    pub fn to_href(&self) -> String {
        let route: String = form_urlencoded::byte_serialize(self.route.as_bytes()).collect();
        if self.params.is_empty() {
            format!("#/{route}")
        } else {
            format!("#/{route}?{}", self.params.to_query_string())
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_href())
    }
}
