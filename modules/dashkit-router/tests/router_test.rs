//! Integration tests for navigation: stale writes, fallbacks, history and
//! page lifecycle ordering.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use dashkit_dom::{Document, Dom, DomError};
use dashkit_html::{html, SafeFragment};
use dashkit_router::{
    CommitOutcome, Layout, NavParams, PageContext, PageModule, PageRegistry, Router, RouterError,
    RouterOptions, RouterState,
};
use tokio::task::LocalSet;

// ---------------------------------------------------------------------------
// Test pages
// ---------------------------------------------------------------------------

/// Renders a heading, then commits `body` after `delay`.
struct SlowPage {
    heading: &'static str,
    body: &'static str,
    delay: Duration,
    outcomes: Rc<RefCell<Vec<CommitOutcome>>>,
    /// Document title as seen through the context when the data arrives.
    seen_titles: RefCell<Vec<String>>,
}

impl SlowPage {
    fn new(heading: &'static str, body: &'static str, delay_ms: u64) -> Self {
        Self {
            heading,
            body,
            delay: Duration::from_millis(delay_ms),
            outcomes: Rc::default(),
            seen_titles: RefCell::default(),
        }
    }
}

#[async_trait(?Send)]
impl PageModule for SlowPage {
    fn render(&self, _params: &NavParams) -> Option<SafeFragment> {
        Some(html!("<h1>" {self.heading} "</h1><div id=\"body\"></div>"))
    }

    async fn init(&self, ctx: PageContext) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        let title = ctx.document().title().to_string();
        self.seen_titles.borrow_mut().push(title);
        let outcome = ctx.commit_to("#body", &html!("<p>" {self.body} "</p>"))?;
        self.outcomes.borrow_mut().push(outcome);
        Ok(())
    }
}

/// Echoes its params so tests can see what the page received.
struct EchoPage;

#[async_trait(?Send)]
impl PageModule for EchoPage {
    fn render(&self, params: &NavParams) -> Option<SafeFragment> {
        let items: Vec<SafeFragment> = params
            .iter()
            .map(|(key, value)| html!("<li data-key=\"" {key} "\">" {value} "</li>"))
            .collect();
        Some(html!("<ul id=\"params\">" {items} "</ul>"))
    }

    async fn init(&self, _ctx: PageContext) -> Result<()> {
        Ok(())
    }
}

struct FailingPage {
    attempts: Cell<usize>,
}

#[async_trait(?Send)]
impl PageModule for FailingPage {
    fn render(&self, _params: &NavParams) -> Option<SafeFragment> {
        Some(html!("<p>rendered before failure</p>"))
    }

    async fn init(&self, _ctx: PageContext) -> Result<()> {
        self.attempts.set(self.attempts.get() + 1);
        bail!("backend exploded")
    }
}

/// Sends visitors on to `target` without leaving a history entry.
struct RedirectPage {
    target: &'static str,
}

#[async_trait(?Send)]
impl PageModule for RedirectPage {
    async fn init(&self, ctx: PageContext) -> Result<()> {
        let navigation = ctx.redirect(self.target, NavParams::new())?;
        assert!(navigation.is_some());
        Ok(())
    }
}

/// Keeps a per-visit record that must start empty on every `init`.
#[derive(Default)]
struct StatefulPage {
    selected: RefCell<Vec<String>>,
    seen_on_entry: RefCell<Vec<usize>>,
}

#[async_trait(?Send)]
impl PageModule for StatefulPage {
    async fn init(&self, ctx: PageContext) -> Result<()> {
        self.selected.borrow_mut().clear();
        self.seen_on_entry.borrow_mut().push(self.selected.borrow().len());
        self.selected.borrow_mut().push(ctx.param("pick").unwrap_or("none").to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

fn dom() -> Dom {
    Dom::new(Document::parse(
        "<html><head><title>host</title></head><body><div id=\"app\"></div></body></html>",
    ))
}

fn registry() -> PageRegistry {
    PageRegistry::builder()
        .route("slow", "Slow", Layout::Dashboard)
        .route("fast", "Fast", Layout::Dashboard)
        .route("login", "Sign in", Layout::Standalone)
        .hidden("not-found", "Not found", Layout::Standalone)
        .hidden("broken", "Broken", Layout::Dashboard)
        .hidden("gate", "Gate", Layout::Standalone)
        .build()
        .unwrap()
}

struct Harness {
    router: Router,
    slow: Rc<SlowPage>,
    fast: Rc<SlowPage>,
    broken: Rc<FailingPage>,
}

fn harness() -> Harness {
    let slow = Rc::new(SlowPage::new("A", "A data", 100));
    let fast = Rc::new(SlowPage::new("B", "B data", 0));
    let broken = Rc::new(FailingPage { attempts: Cell::new(0) });
    let router = Router::builder(dom(), registry())
        .options(RouterOptions {
            app_name: "Acme Console".into(),
            default_route: "slow".into(),
            ..RouterOptions::default()
        })
        .shared_page("slow", slow.clone())
        .shared_page("fast", fast.clone())
        .shared_page("broken", broken.clone())
        .page("login", EchoPage)
        .page("not-found", EchoPage)
        .page("gate", RedirectPage { target: "fast" })
        .build()
        .unwrap();
    Harness {
        router,
        slow,
        fast,
        broken,
    }
}

fn text(router: &Router, selector: &str) -> Option<String> {
    router.dom().text(selector).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn late_page_cannot_overwrite_newer_page() {
    LocalSet::new()
        .run_until(async {
            let h = harness();

            let a = h.router.navigate_to("slow", NavParams::new()).unwrap();
            let b = h.router.navigate_to("fast", NavParams::new()).unwrap();
            b.settled().await;
            assert_eq!(text(&h.router, "#body").as_deref(), Some("B data"));

            // A's fetch resolves 100ms later, after the user already moved on.
            a.settled().await;
            assert_eq!(text(&h.router, "h1").as_deref(), Some("B"));
            assert_eq!(text(&h.router, "#body").as_deref(), Some("B data"));
            assert_eq!(*h.slow.outcomes.borrow(), vec![CommitOutcome::Stale]);
            assert_eq!(*h.fast.outcomes.borrow(), vec![CommitOutcome::Committed]);
            // The late page could still read the document, and saw B's.
            assert_eq!(*h.slow.seen_titles.borrow(), vec!["Fast · Acme Console".to_string()]);
            assert_eq!(h.router.state(), RouterState::Active { route: "fast".into() });
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn slow_page_commits_when_still_current() {
    LocalSet::new()
        .run_until(async {
            let h = harness();
            let nav = h.router.start().unwrap();
            assert_eq!(text(&h.router, "#body").as_deref(), Some(""));
            nav.settled().await;
            assert_eq!(text(&h.router, "#body").as_deref(), Some("A data"));
        })
        .await;
}

#[tokio::test]
async fn unknown_route_shows_not_found_page() {
    LocalSet::new()
        .run_until(async {
            let h = harness();
            let nav = h.router.navigate_to("billing", NavParams::new()).unwrap();

            assert_eq!(nav.route(), "not-found");
            assert_eq!(nav.redirected_from(), Some("billing"));
            assert_eq!(
                text(&h.router, "li[data-key=\"path\"]").as_deref(),
                Some("billing")
            );
            assert_eq!(h.router.dom().title(), "Not found · Acme Console");
            nav.settled().await;
        })
        .await;
}

#[tokio::test]
async fn href_params_reach_the_page_escaped() {
    LocalSet::new()
        .run_until(async {
            let h = harness();
            h.router
                .navigate_href("#/login?next=%3Cscript%3E&next=%2Fideas&mode=sso")
                .unwrap()
                .settled()
                .await;

            let markup = h.router.dom().to_html();
            assert!(!markup.contains("<script>"));
            assert_eq!(text(&h.router, "li[data-key=\"next\"]").as_deref(), Some("/ideas"));
            assert_eq!(text(&h.router, "li[data-key=\"mode\"]").as_deref(), Some("sso"));
        })
        .await;
}

#[tokio::test]
async fn layouts_switch_and_history_walks_back() {
    LocalSet::new()
        .run_until(async {
            let h = harness();
            h.router.navigate_to("fast", NavParams::new()).unwrap().settled().await;
            assert!(h.router.dom().query(".sidebar").unwrap().is_some());
            assert_eq!(
                text(&h.router, "a.active").as_deref(),
                Some("Fast"),
                "active nav entry follows the route"
            );

            h.router.navigate_to("login", NavParams::new()).unwrap().settled().await;
            assert!(h.router.dom().query(".sidebar").unwrap().is_none());
            assert_eq!(h.router.dom().title(), "Sign in · Acme Console");

            let back = h.router.back().unwrap().expect("history has an earlier entry");
            assert_eq!(back.route(), "fast");
            back.settled().await;
            assert!(h.router.dom().query(".sidebar").unwrap().is_some());
            assert_eq!(h.router.current_location().unwrap().route, "fast");

            let forward = h.router.forward().unwrap().expect("forward entry kept");
            assert_eq!(forward.route(), "login");
            forward.settled().await;
            assert!(h.router.forward().unwrap().is_none());
        })
        .await;
}

#[tokio::test]
async fn failing_init_leaves_rendered_page_in_place() {
    LocalSet::new()
        .run_until(async {
            let h = harness();
            let nav = h.router.navigate_to("broken", NavParams::new()).unwrap();
            nav.settled().await;

            assert_eq!(h.broken.attempts.get(), 1);
            assert_eq!(
                text(&h.router, "#page-content").as_deref(),
                Some("rendered before failure")
            );
            assert_eq!(h.router.state(), RouterState::Active { route: "broken".into() });
        })
        .await;
}

#[tokio::test]
async fn page_state_resets_on_each_visit() {
    LocalSet::new()
        .run_until(async {
            let page = Rc::new(StatefulPage::default());
            let registry = PageRegistry::builder()
                .route("ideas", "Ideas", Layout::Dashboard)
                .build()
                .unwrap();
            let router = Router::builder(dom(), registry)
                .options(RouterOptions {
                    default_route: "ideas".into(),
                    ..RouterOptions::default()
                })
                .shared_page("ideas", page.clone())
                .build()
                .unwrap();

            for pick in ["one", "two", "three"] {
                router
                    .navigate_to("ideas", NavParams::new().with("pick", pick))
                    .unwrap()
                    .settled()
                    .await;
            }

            assert_eq!(*page.seen_on_entry.borrow(), vec![0, 0, 0]);
            assert_eq!(*page.selected.borrow(), vec!["three".to_string()]);
            assert_eq!(router.generation(), 3);
        })
        .await;
}

#[tokio::test]
async fn shell_placeholder_shows_until_render() {
    LocalSet::new()
        .run_until(async {
            let page = Rc::new(StatefulPage::default());
            let registry = PageRegistry::builder()
                .route("ideas", "Ideas", Layout::Dashboard)
                .build()
                .unwrap();
            let router = Router::builder(dom(), registry)
                .shared_page("ideas", page)
                .build()
                .unwrap();

            // No render: the loading skeleton stays until init commits.
            let nav = router.navigate_to("ideas", NavParams::new()).unwrap();
            let slot = router.dom().query("#page-content [aria-busy]").unwrap();
            assert!(slot.is_some());
            nav.settled().await;
        })
        .await;
}

#[tokio::test]
async fn failed_back_keeps_history_position() {
    LocalSet::new()
        .run_until(async {
            let h = harness();
            h.router.navigate_to("fast", NavParams::new()).unwrap().settled().await;
            h.router.navigate_to("login", NavParams::new()).unwrap().settled().await;

            // Without a mount point every navigation fails.
            h.router.dom().commit("body", &html!("<p>gone</p>")).unwrap();
            assert!(matches!(
                h.router.back(),
                Err(RouterError::Dom(DomError::MissingRoot(_)))
            ));
            assert_eq!(h.router.current_location().unwrap().route, "login");

            h.router
                .dom()
                .commit("body", &html!("<div id=\"app\"></div>"))
                .unwrap();
            let back = h.router.back().unwrap().expect("earlier entry still there");
            assert_eq!(back.route(), "fast");
            back.settled().await;
            assert_eq!(h.router.current_location().unwrap().route, "fast");
        })
        .await;
}

#[tokio::test]
async fn redirect_from_init_replaces_the_history_entry() {
    LocalSet::new()
        .run_until(async {
            let h = harness();
            h.router.navigate_to("login", NavParams::new()).unwrap().settled().await;
            h.router.navigate_to("gate", NavParams::new()).unwrap().settled().await;

            assert_eq!(h.router.state(), RouterState::Active { route: "fast".into() });
            assert_eq!(h.router.current_location().unwrap().route, "fast");

            let back = h.router.back().unwrap().expect("login is one step back");
            assert_eq!(back.route(), "login");
            back.settled().await;
            assert!(h.router.back().unwrap().is_none());
        })
        .await;
}
