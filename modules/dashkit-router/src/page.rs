//! The page contract and the per-navigation context handed to `init`.

use std::cell::Ref;

use async_trait::async_trait;
use dashkit_dom::{Document, Dom, Event};
use dashkit_html::SafeFragment;
use tracing::debug;

use crate::error::RouterResult;
use crate::guard::Generation;
use crate::params::NavParams;
use crate::router::{Navigation, Navigator};
use crate::shell::CONTENT_SLOT;

/// A routed page.
///
/// `render` runs synchronously during navigation and its fragment replaces
/// the loading placeholder. `init` runs afterwards on the local task set and
/// owns everything asynchronous: fetching, committing results, attaching
/// listeners. Pages keep their own state and reset it at the start of
/// `init`.
#[async_trait(?Send)]
pub trait PageModule {
    fn render(&self, _params: &NavParams) -> Option<SafeFragment> {
        None
    }

    async fn init(&self, ctx: PageContext) -> anyhow::Result<()>;
}

/// What happened to a guarded write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// A newer navigation started; nothing was written.
    Stale,
    /// The selector matched nothing in the current document.
    TargetMissing,
}

impl CommitOutcome {
    pub fn is_committed(self) -> bool {
        self == CommitOutcome::Committed
    }
}

/// Everything a page's `init` may touch, bound to one navigation.
///
/// Every write checks the navigation generation first, so a slow page that
/// resolves after the user moved on cannot overwrite the newer page.
#[derive(Clone)]
pub struct PageContext {
    route: String,
    params: NavParams,
    generation: u64,
    current: Generation,
    dom: Dom,
    navigator: Navigator,
}

impl PageContext {
    pub(crate) fn new(
        route: String,
        params: NavParams,
        generation: u64,
        current: Generation,
        dom: Dom,
        navigator: Navigator,
    ) -> Self {
        Self {
            route,
            params,
            generation,
            current,
            dom,
            navigator,
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn params(&self) -> &NavParams {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether this context still belongs to the active navigation.
    pub fn is_current(&self) -> bool {
        self.current.is_current(self.generation)
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Read-only view of the document. Writes go through the guarded
    /// methods below. Drop the borrow before committing or navigating.
    pub fn document(&self) -> Ref<'_, Document> {
        self.dom.borrow()
    }

    /// Replace this page with `route` without adding a history entry.
    /// Returns `None` once a newer navigation has started.
    pub fn redirect(&self, route: &str, params: NavParams) -> RouterResult<Option<Navigation>> {
        if !self.check("redirect", route) {
            return Ok(None);
        }
        self.navigator.replace_to(route, params).map(Some)
    }

    /// Replace the page content slot.
    pub fn commit(&self, fragment: &SafeFragment) -> RouterResult<CommitOutcome> {
        self.commit_to(CONTENT_SLOT, fragment)
    }

    /// Replace the children of the first element matching `selector`.
    pub fn commit_to(&self, selector: &str, fragment: &SafeFragment) -> RouterResult<CommitOutcome> {
        if !self.check("commit", selector) {
            return Ok(CommitOutcome::Stale);
        }
        if self.dom.commit(selector, fragment)? {
            Ok(CommitOutcome::Committed)
        } else {
            Ok(CommitOutcome::TargetMissing)
        }
    }

    /// Attach a listener to the first element matching `selector`.
    pub fn on<F>(&self, selector: &str, event: &str, handler: F) -> RouterResult<CommitOutcome>
    where
        F: Fn(&Event) + 'static,
    {
        if !self.check("listen", selector) {
            return Ok(CommitOutcome::Stale);
        }
        match self.dom.query(selector)? {
            Some(target) => {
                self.dom.on(target, event, handler)?;
                Ok(CommitOutcome::Committed)
            }
            None => Ok(CommitOutcome::TargetMissing),
        }
    }

    /// Run `f` against the document if this navigation is still current.
    pub fn update<R>(&self, f: impl FnOnce(&mut Document) -> R) -> Option<R> {
        if !self.check("update", "document") {
            return None;
        }
        Some(f(&mut self.dom.borrow_mut()))
    }

    fn check(&self, op: &'static str, selector: &str) -> bool {
        let current = self.is_current();
        if !current {
            debug!(
                route = %self.route,
                generation = self.generation,
                current = self.current.current(),
                op,
                selector,
                "Dropping stale write"
            );
        }
        current
    }
}
