//! Records the demo pages show and the accessor trait that serves them.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use dashkit_ui::{DataFetchError, FetchResult, Status};
use serde::{Deserialize, Serialize};
use tracing::debug;

const BUNDLED_FIXTURES: &str = include_str!("../fixtures/mock.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: u32,
    pub title: String,
    pub summary: String,
    pub status: Status,
    /// 0-100
    pub score: u8,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub status: Status,
    pub owner: String,
    pub budget: f64,
    /// Percent complete.
    pub progress: u8,
    pub idea_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub project_id: u32,
    pub at: String,
    pub message: String,
}

/// Async accessors used by page modules.
#[async_trait(?Send)]
pub trait DataSource {
    async fn ideas(&self) -> FetchResult<Vec<Idea>>;
    async fn idea(&self, id: u32) -> FetchResult<Idea>;
    async fn projects(&self) -> FetchResult<Vec<Project>>;
    async fn project(&self, id: u32) -> FetchResult<Project>;
    async fn project_activity(&self, project_id: u32) -> FetchResult<Vec<Activity>>;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MockData {
    #[serde(default)]
    pub ideas: Vec<Idea>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub activity: Vec<Activity>,
}

/// In-memory [`DataSource`] with per-call latency and failure injection.
///
/// Failures are keyed by call: `ideas`, `idea:<id>`, `projects`,
/// `project:<id>`, `activity:<project id>`.
#[derive(Debug)]
pub struct MockDataSource {
    data: MockData,
    latency: Duration,
    failing: RefCell<HashSet<String>>,
    calls: Cell<usize>,
}

impl MockDataSource {
    pub fn new(data: MockData) -> Self {
        Self {
            data,
            latency: Duration::ZERO,
            failing: RefCell::default(),
            calls: Cell::new(0),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: MockData = serde_json::from_str(json).context("Failed to parse mock fixtures")?;
        Ok(Self::new(data))
    }

    /// The fixtures shipped with the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_FIXTURES)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_failures<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing.borrow_mut().extend(keys.into_iter().map(Into::into));
        self
    }

    /// Make calls matching `key` fail until [`MockDataSource::recover`].
    pub fn fail(&self, key: impl Into<String>) {
        self.failing.borrow_mut().insert(key.into());
    }

    pub fn recover(&self, key: &str) {
        self.failing.borrow_mut().remove(key);
    }

    /// Total calls served, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    async fn call(&self, key: String) -> FetchResult<()> {
        self.calls.set(self.calls.get() + 1);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.borrow().contains(&key) {
            debug!(call = %key, "Injected failure");
            return Err(DataFetchError::Unavailable(format!("{key} is failing")));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl DataSource for MockDataSource {
    async fn ideas(&self) -> FetchResult<Vec<Idea>> {
        self.call("ideas".to_string()).await?;
        Ok(self.data.ideas.clone())
    }

    async fn idea(&self, id: u32) -> FetchResult<Idea> {
        self.call(format!("idea:{id}")).await?;
        self.data
            .ideas
            .iter()
            .find(|idea| idea.id == id)
            .cloned()
            .ok_or_else(|| DataFetchError::NotFound {
                kind: "idea",
                id: id.to_string(),
            })
    }

    async fn projects(&self) -> FetchResult<Vec<Project>> {
        self.call("projects".to_string()).await?;
        Ok(self.data.projects.clone())
    }

    async fn project(&self, id: u32) -> FetchResult<Project> {
        self.call(format!("project:{id}")).await?;
        self.data
            .projects
            .iter()
            .find(|project| project.id == id)
            .cloned()
            .ok_or_else(|| DataFetchError::NotFound {
                kind: "project",
                id: id.to_string(),
            })
    }

    async fn project_activity(&self, project_id: u32) -> FetchResult<Vec<Activity>> {
        self.call(format!("activity:{project_id}")).await?;
        Ok(self
            .data
            .activity
            .iter()
            .filter(|entry| entry.project_id == project_id)
            .cloned()
            .collect())
    }
}
