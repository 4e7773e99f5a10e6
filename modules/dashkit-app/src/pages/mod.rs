//! Demo page modules.

use std::rc::Rc;

use dashkit_html::{html, SafeFragment};
use dashkit_router::{CommitOutcome, PageContext, RouterBuilder, RouterResult};
use dashkit_ui::{error_state, DataFetchError, ErrorOptions, RETRY_SELECTOR};
use futures::future::LocalBoxFuture;

use crate::data::DataSource;

mod dashboard;
mod ideas;
mod login;
mod not_found;
mod project_detail;
mod projects;

pub use dashboard::DashboardPage;
pub use ideas::{IdeasPage, IDEA_DIALOG};
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use project_detail::ProjectDetailPage;
pub use projects::ProjectsPage;

pub const DASHBOARD: &str = "dashboard";
pub const IDEAS: &str = "ideas";
pub const PROJECTS: &str = "projects";
pub const PROJECT_DETAIL: &str = "project-detail";
pub const LOGIN: &str = "login";
pub const NOT_FOUND: &str = "not-found";

/// Register every demo page against `builder`.
pub fn register(builder: RouterBuilder, data: Rc<dyn DataSource>) -> RouterBuilder {
    builder
        .page(DASHBOARD, DashboardPage::new(data.clone()))
        .page(IDEAS, IdeasPage::new(data.clone()))
        .page(PROJECTS, ProjectsPage::new(data.clone()))
        .page(PROJECT_DETAIL, ProjectDetailPage::new(data))
        .page(LOGIN, LoginPage)
        .page(NOT_FOUND, NotFoundPage)
}

fn page_header(title: &str, subtitle: &str) -> SafeFragment {
    html!(
        "<header class=\"page-header\">"
        "<h1>" {title} "</h1>"
        "<p class=\"subtitle\">" {subtitle} "</p>"
        "</header>"
    )
}

/// Replace `selector` with an error state for `err`. Retryable errors get a
/// retry button that runs `reload` with a fresh clone of the context.
fn show_fetch_error<F>(
    ctx: &PageContext,
    selector: &str,
    title: &str,
    err: &DataFetchError,
    reload: F,
) -> RouterResult<CommitOutcome>
where
    F: Fn(PageContext) -> LocalBoxFuture<'static, ()> + 'static,
{
    let options = ErrorOptions {
        title: title.to_string(),
        message: err.to_string(),
        retry_label: err.is_retryable().then(|| "Try again".to_string()),
    };
    let outcome = ctx.commit_to(selector, &error_state(&options))?;
    if outcome.is_committed() && err.is_retryable() {
        let retry_ctx = ctx.clone();
        let button = format!("{selector} {RETRY_SELECTOR}");
        ctx.on(&button, "click", move |_| {
            tracing::debug!(route = retry_ctx.route(), "Retrying after fetch error");
            tokio::task::spawn_local(reload(retry_ctx.clone()));
        })?;
    }
    Ok(outcome)
}
