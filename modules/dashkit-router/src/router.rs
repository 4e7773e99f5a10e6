//! The navigation loop.
//!
//! Resolve -> mount shell -> render -> init. Each navigation bumps the
//! generation so writes from pages the user already left are dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use dashkit_dom::{Dom, DomError};
use dashkit_ui::{skeleton, SkeletonKind, SkeletonOptions};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{RouterError, RouterResult};
use crate::guard::Generation;
use crate::history::History;
use crate::options::RouterOptions;
use crate::page::{PageContext, PageModule};
use crate::params::{Location, NavParams};
use crate::registry::{PageRegistry, RouteEntry};
use crate::shell::{render_shell, CONTENT_SLOT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterState {
    Idle,
    Resolving { route: String, params: NavParams },
    Active { route: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Push,
    Replace,
    Traverse,
}

struct RouterInner {
    dom: Dom,
    registry: PageRegistry,
    options: RouterOptions,
    modules: HashMap<String, Rc<dyn PageModule>>,
    generation: Generation,
    state: RefCell<RouterState>,
    history: RefCell<History>,
}

/// Single-threaded router. Clones share state.
///
/// Navigation spawns page `init` futures with `tokio::task::spawn_local`,
/// so it must run inside a `LocalSet`.
#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.inner.registry.len())
            .field("generation", &self.inner.generation.current())
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

pub struct RouterBuilder {
    dom: Dom,
    registry: PageRegistry,
    options: RouterOptions,
    modules: HashMap<String, Rc<dyn PageModule>>,
}

impl RouterBuilder {
    pub fn options(mut self, options: RouterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn page(self, key: impl Into<String>, module: impl PageModule + 'static) -> Self {
        self.shared_page(key, Rc::new(module))
    }

    /// Register a module the caller keeps a handle to.
    pub fn shared_page(mut self, key: impl Into<String>, module: Rc<dyn PageModule>) -> Self {
        let key = key.into();
        if self.modules.insert(key.clone(), module).is_some() {
            warn!(route = %key, "Page module registered twice, keeping the last one");
        }
        self
    }

    /// Check that routes and modules match one to one.
    pub fn build(self) -> RouterResult<Router> {
        if let Some(key) = self.registry.keys().find(|key| !self.modules.contains_key(*key)) {
            return Err(RouterError::MissingModule(key.to_string()));
        }
        let mut unregistered: Vec<&String> = self
            .modules
            .keys()
            .filter(|key| !self.registry.contains(key))
            .collect();
        unregistered.sort();
        if let Some(key) = unregistered.first() {
            return Err(RouterError::UnregisteredModule(key.to_string()));
        }
        if !self.registry.contains(&self.options.not_found_route) {
            warn!(
                route = %self.options.not_found_route,
                "Not-found route is not registered; unknown routes will fail"
            );
        }

        debug!(routes = self.registry.len(), "Router built");
        Ok(Router {
            inner: Rc::new(RouterInner {
                dom: self.dom,
                registry: self.registry,
                options: self.options,
                modules: self.modules,
                generation: Generation::new(),
                state: RefCell::new(RouterState::Idle),
                history: RefCell::new(History::new()),
            }),
        })
    }
}

/// Handle to a started navigation.
#[derive(Debug)]
pub struct Navigation {
    generation: u64,
    route: String,
    redirected_from: Option<String>,
    task: JoinHandle<()>,
}

impl Navigation {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Route that was actually mounted.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Requested key when an unknown route was redirected to not-found.
    pub fn redirected_from(&self) -> Option<&str> {
        self.redirected_from.as_deref()
    }

    /// Wait for the page's `init` to finish.
    pub async fn settled(self) {
        if let Err(e) = self.task.await {
            error!(route = %self.route, generation = self.generation, error = %e, "Page init task aborted");
        }
    }
}

impl Router {
    pub fn builder(dom: Dom, registry: PageRegistry) -> RouterBuilder {
        RouterBuilder {
            dom,
            registry,
            options: RouterOptions::default(),
            modules: HashMap::new(),
        }
    }

    pub fn navigator(&self) -> Navigator {
        Navigator {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn dom(&self) -> &Dom {
        &self.inner.dom
    }

    pub fn registry(&self) -> &PageRegistry {
        &self.inner.registry
    }

    pub fn options(&self) -> &RouterOptions {
        &self.inner.options
    }

    pub fn state(&self) -> RouterState {
        self.inner.state.borrow().clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation.current()
    }

    pub fn current_location(&self) -> Option<Location> {
        self.inner.history.borrow().current().cloned()
    }

    /// Navigate to the configured default route.
    pub fn start(&self) -> RouterResult<Navigation> {
        let route = self.inner.options.default_route.clone();
        self.navigate_to(&route, NavParams::new())
    }

    pub fn navigate_to(&self, route: &str, params: NavParams) -> RouterResult<Navigation> {
        self.navigate(Location::new(route, params), Visit::Push)
    }

    /// Navigate to a `#/<route>?<query>` location. An empty route means
    /// the default route.
    pub fn navigate_href(&self, href: &str) -> RouterResult<Navigation> {
        let mut location = Location::parse(href);
        if location.route.is_empty() {
            location.route = self.inner.options.default_route.clone();
        }
        self.navigate(location, Visit::Push)
    }

    /// Like [`Router::navigate_to`], but the new location takes the place
    /// of the current history entry.
    pub fn replace_to(&self, route: &str, params: NavParams) -> RouterResult<Navigation> {
        self.navigate(Location::new(route, params), Visit::Replace)
    }

    /// Re-open the previous location. `None` at the start of history.
    pub fn back(&self) -> RouterResult<Option<Navigation>> {
        self.traverse(History::back, History::forward)
    }

    pub fn forward(&self) -> RouterResult<Option<Navigation>> {
        self.traverse(History::forward, History::back)
    }

    /// Move the history cursor with `step` and open the entry there. A
    /// failed navigation moves the cursor back with `undo`.
    fn traverse(
        &self,
        step: fn(&mut History) -> Option<Location>,
        undo: fn(&mut History) -> Option<Location>,
    ) -> RouterResult<Option<Navigation>> {
        let location = step(&mut *self.inner.history.borrow_mut());
        let Some(location) = location else {
            return Ok(None);
        };
        let result = self.navigate(location, Visit::Traverse);
        if result.is_err() {
            undo(&mut *self.inner.history.borrow_mut());
        }
        result.map(Some)
    }

    fn navigate(&self, requested: Location, visit: Visit) -> RouterResult<Navigation> {
        let result = self.try_navigate(requested, visit);
        if let Err(e) = &result {
            self.set_state(RouterState::Idle);
            error!(error = %e, "Navigation failed");
        }
        result
    }

    fn try_navigate(&self, requested: Location, visit: Visit) -> RouterResult<Navigation> {
        let inner = &self.inner;

        // 1. New generation; whatever the previous page still has in flight is now stale
        let generation = inner.generation.advance();
        self.set_state(RouterState::Resolving {
            route: requested.route.clone(),
            params: requested.params.clone(),
        });
        debug!(route = %requested.route, generation, "Resolving route");

        // 2. Resolve, sending unknown keys to the not-found page
        let (location, redirected_from) = self.resolve(requested)?;
        let entry = self.entry(&location.route)?;
        let module = inner
            .modules
            .get(&location.route)
            .cloned()
            .ok_or_else(|| RouterError::MissingModule(location.route.clone()))?;

        // 3. Shell with a loading placeholder, then the title
        let placeholder = skeleton(SkeletonKind::Cards, &SkeletonOptions::default());
        let shell = render_shell(
            entry.layout,
            &inner.registry,
            &inner.options.app_name,
            &location.route,
            &placeholder,
        );
        if !inner.dom.commit(&inner.options.root_selector, &shell)? {
            return Err(DomError::MissingRoot(inner.options.root_selector.clone()).into());
        }
        inner
            .dom
            .borrow_mut()
            .set_title(&format!("{} · {}", entry.title, inner.options.app_name))?;

        // 4. Synchronous render replaces the placeholder
        if let Some(fragment) = module.render(&location.params) {
            inner.dom.commit(CONTENT_SLOT, &fragment)?;
        }

        // 5. Active, recorded in history unless walking it
        self.set_state(RouterState::Active {
            route: location.route.clone(),
        });
        match visit {
            Visit::Push => inner.history.borrow_mut().push(location.clone()),
            Visit::Replace => inner.history.borrow_mut().replace(location.clone()),
            Visit::Traverse => {}
        }

        // 6. Async init on the local set
        let ctx = PageContext::new(
            location.route.clone(),
            location.params,
            generation,
            inner.generation.clone(),
            inner.dom.clone(),
            self.navigator(),
        );
        let task = tokio::task::spawn_local(run_init(module, ctx));

        info!(
            route = %location.route,
            generation,
            redirected = redirected_from.is_some(),
            "Navigated"
        );
        Ok(Navigation {
            generation,
            route: location.route,
            redirected_from,
            task,
        })
    }

    fn resolve(&self, requested: Location) -> RouterResult<(Location, Option<String>)> {
        let registry = &self.inner.registry;
        if registry.contains(&requested.route) {
            return Ok((requested, None));
        }

        let not_found = &self.inner.options.not_found_route;
        let unknown = RouterError::UnknownRoute(requested.route.clone());
        if !registry.contains(not_found) {
            return Err(unknown);
        }
        warn!(error = %unknown, redirect = %not_found, "Unknown route, showing not-found page");
        let params = NavParams::new().with("path", requested.route.as_str());
        Ok((Location::new(not_found.as_str(), params), Some(requested.route)))
    }

    fn entry(&self, route: &str) -> RouterResult<RouteEntry> {
        self.inner
            .registry
            .get(route)
            .cloned()
            .ok_or_else(|| RouterError::UnknownRoute(route.to_string()))
    }

    fn set_state(&self, state: RouterState) {
        *self.inner.state.borrow_mut() = state;
    }
}

async fn run_init(module: Rc<dyn PageModule>, ctx: PageContext) {
    let route = ctx.route().to_string();
    let generation = ctx.generation();
    match module.init(ctx).await {
        Ok(()) => debug!(route = %route, generation, "Page init finished"),
        Err(e) => error!(route = %route, generation, error = %format!("{e:#}"), "Page init failed"),
    }
}

/// Weak handle pages use to navigate without keeping the router alive.
#[derive(Clone)]
pub struct Navigator {
    inner: Weak<RouterInner>,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("attached", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Navigator {
    fn router(&self) -> RouterResult<Router> {
        self.inner
            .upgrade()
            .map(|inner| Router { inner })
            .ok_or(RouterError::Dropped)
    }

    pub fn navigate_to(&self, route: &str, params: NavParams) -> RouterResult<Navigation> {
        self.router()?.navigate_to(route, params)
    }

    pub fn navigate_href(&self, href: &str) -> RouterResult<Navigation> {
        self.router()?.navigate_href(href)
    }

    pub fn replace_to(&self, route: &str, params: NavParams) -> RouterResult<Navigation> {
        self.router()?.replace_to(route, params)
    }

    pub fn back(&self) -> RouterResult<Option<Navigation>> {
        self.router()?.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::CommitOutcome;
    use crate::registry::Layout;
    use async_trait::async_trait;
    use dashkit_dom::Document;
    use dashkit_html::{html, SafeFragment};
    use std::cell::Cell;
    use tokio::task::LocalSet;

    struct Static(&'static str);

    #[async_trait(?Send)]
    impl PageModule for Static {
        fn render(&self, _params: &NavParams) -> Option<SafeFragment> {
            Some(html!("<h1>" {self.0} "</h1>"))
        }

        async fn init(&self, _ctx: PageContext) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Counting {
        inits: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl PageModule for Counting {
        async fn init(&self, ctx: PageContext) -> anyhow::Result<()> {
            self.inits.set(self.inits.get() + 1);
            ctx.commit(&html!("<p>init " {self.inits.get()} "</p>"))?;
            Ok(())
        }
    }

    fn dom() -> Dom {
        Dom::new(Document::parse(
            "<html><head><title></title></head><body><div id=\"app\"></div></body></html>",
        ))
    }

    fn registry() -> PageRegistry {
        PageRegistry::builder()
            .route("dashboard", "Dashboard", Layout::Dashboard)
            .route("login", "Sign in", Layout::Standalone)
            .route("not-found", "Not found", Layout::Standalone)
            .build()
            .unwrap()
    }

    fn router() -> Router {
        Router::builder(dom(), registry())
            .options(RouterOptions {
                app_name: "Acme".into(),
                ..RouterOptions::default()
            })
            .page("dashboard", Static("Home"))
            .page("login", Static("Sign in"))
            .page("not-found", Static("Nothing here"))
            .build()
            .unwrap()
    }

    #[test]
    fn build_requires_a_module_per_route() {
        let err = Router::builder(dom(), registry())
            .page("dashboard", Static("Home"))
            .page("login", Static("Sign in"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RouterError::MissingModule(key) if key == "not-found"));
    }

    #[test]
    fn build_rejects_modules_without_routes() {
        let err = Router::builder(dom(), registry())
            .page("dashboard", Static("Home"))
            .page("login", Static("Sign in"))
            .page("not-found", Static("Nothing here"))
            .page("billing", Static("Billing"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RouterError::UnregisteredModule(key) if key == "billing"));
    }

    #[tokio::test]
    async fn navigation_mounts_shell_title_and_render() {
        LocalSet::new()
            .run_until(async {
                let router = router();
                assert_eq!(router.state(), RouterState::Idle);

                let nav = router.start().unwrap();
                assert_eq!(nav.route(), "dashboard");
                assert_eq!(router.state(), RouterState::Active { route: "dashboard".into() });
                assert_eq!(router.dom().title(), "Dashboard · Acme");
                assert_eq!(router.dom().text("#page-content h1").unwrap().as_deref(), Some("Home"));
                assert!(router.dom().query(".sidebar").unwrap().is_some());
                nav.settled().await;
            })
            .await;
    }

    #[tokio::test]
    async fn missing_root_is_an_error() {
        LocalSet::new()
            .run_until(async {
                let router = Router::builder(Dom::default(), registry())
                    .page("dashboard", Static("Home"))
                    .page("login", Static("Sign in"))
                    .page("not-found", Static("Nothing here"))
                    .build()
                    .unwrap();
                let err = router.start().unwrap_err();
                assert!(matches!(err, RouterError::Dom(DomError::MissingRoot(_))));
                assert_eq!(router.state(), RouterState::Idle);
            })
            .await;
    }

    #[tokio::test]
    async fn unknown_route_without_not_found_page_is_an_error() {
        LocalSet::new()
            .run_until(async {
                let registry = PageRegistry::builder()
                    .route("dashboard", "Dashboard", Layout::Dashboard)
                    .build()
                    .unwrap();
                let router = Router::builder(dom(), registry)
                    .page("dashboard", Static("Home"))
                    .build()
                    .unwrap();
                let err = router.navigate_to("billing", NavParams::new()).unwrap_err();
                assert!(matches!(err, RouterError::UnknownRoute(key) if key == "billing"));
            })
            .await;
    }

    #[tokio::test]
    async fn navigator_reaches_the_router() {
        LocalSet::new()
            .run_until(async {
                let router = router();
                let navigator = router.navigator();
                navigator.navigate_href("#/login").unwrap().settled().await;
                assert_eq!(router.state(), RouterState::Active { route: "login".into() });
                assert!(router.dom().query(".sidebar").unwrap().is_none());

                navigator.navigate_href("#/").unwrap().settled().await;
                assert_eq!(router.state(), RouterState::Active { route: "dashboard".into() });

                drop(router);
                assert!(matches!(
                    navigator.navigate_to("dashboard", NavParams::new()),
                    Err(RouterError::Dropped)
                ));
            })
            .await;
    }

    #[tokio::test]
    async fn init_runs_after_render_on_every_visit() {
        LocalSet::new()
            .run_until(async {
                let counting = Rc::new(Counting::default());
                let registry = PageRegistry::builder()
                    .route("dashboard", "Dashboard", Layout::Dashboard)
                    .build()
                    .unwrap();
                let router = Router::builder(dom(), registry)
                    .shared_page("dashboard", counting.clone())
                    .build()
                    .unwrap();

                let nav = router.start().unwrap();
                // Not run yet: init is spawned, not called inline.
                assert_eq!(counting.inits.get(), 0);
                nav.settled().await;
                assert_eq!(router.dom().text("#page-content").unwrap().as_deref(), Some("init 1"));

                router.start().unwrap().settled().await;
                assert_eq!(counting.inits.get(), 2);
                assert_eq!(router.generation(), 2);
            })
            .await;
    }

    #[test]
    fn commit_outcome_reports_success() {
        assert!(CommitOutcome::Committed.is_committed());
        assert!(!CommitOutcome::Stale.is_committed());
    }
}
