//! Demo dashboard built on the dashkit engine: config loading, mock data
//! and the page modules.

pub mod config;
pub mod data;
pub mod pages;
pub mod session;

use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use dashkit_dom::{Document, Dom};
use dashkit_router::Router;

use crate::config::{FileConfig, MockConfig};
use crate::data::{DataSource, MockDataSource};

const HOST_PAGE: &str = "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title></title></head>\
<body><div id=\"app\"></div></body></html>";

/// The empty host page the router mounts into.
pub fn host_document() -> Document {
    Document::parse(HOST_PAGE)
}

/// Build the mock data source described by `[mock]`. `latency_ms`
/// overrides the configured latency.
pub fn mock_source(mock: &MockConfig, latency_ms: Option<u64>) -> Result<MockDataSource> {
    let source = match &mock.fixtures {
        Some(path) => load_fixtures(path)?,
        None => MockDataSource::bundled()?,
    };
    let latency = Duration::from_millis(latency_ms.unwrap_or(mock.latency_ms));
    Ok(source
        .with_latency(latency)
        .with_failures(mock.fail.iter().cloned()))
}

fn load_fixtures(path: &Path) -> Result<MockDataSource> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixtures: {}", path.display()))?;
    MockDataSource::from_json(&json)
}

/// Registry from `[[routes]]`, options from `[app]`, demo pages on top.
pub fn build_router(dom: Dom, config: &FileConfig, data: Rc<dyn DataSource>) -> Result<Router> {
    let registry = config.registry()?;
    let builder = Router::builder(dom, registry).options(config.app.clone());
    pages::register(builder, data)
        .build()
        .context("Routes and page modules do not match")
}
