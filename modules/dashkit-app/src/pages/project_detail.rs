use std::rc::Rc;

use async_trait::async_trait;
use dashkit_html::{html, SafeFragment};
use dashkit_router::{NavParams, PageContext, PageModule};
use dashkit_ui::{empty_state, error_state, skeleton, EmptyOptions, ErrorOptions, SkeletonKind, SkeletonOptions};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use tracing::debug;

use super::dashboard::format_currency;
use super::{show_fetch_error, PROJECTS};
use crate::data::{Activity, DataSource, Project};

const DETAIL: &str = "#project";
const ACTIVITY: &str = "#project-activity";

/// One project, loaded from `?id=`. Activity is supplementary and
/// disappears quietly when it cannot be loaded.
pub struct ProjectDetailPage {
    data: Rc<dyn DataSource>,
}

impl ProjectDetailPage {
    pub fn new(data: Rc<dyn DataSource>) -> Self {
        Self { data }
    }
}

#[async_trait(?Send)]
impl PageModule for ProjectDetailPage {
    fn render(&self, _params: &NavParams) -> Option<SafeFragment> {
        let options = SkeletonOptions {
            rows: 1,
            label: "Loading project".to_string(),
        };
        Some(html!(
            "<a class=\"back-link\" href=\"#/" {PROJECTS} "\">All projects</a>"
            "<article id=\"project\">" {skeleton(SkeletonKind::Detail, &options)} "</article>"
        ))
    }

    async fn init(&self, ctx: PageContext) -> anyhow::Result<()> {
        let Some(raw) = ctx.param("id") else {
            debug!("No project id, showing the project list");
            ctx.redirect(PROJECTS, NavParams::new())?;
            return Ok(());
        };
        let Ok(id) = raw.parse::<u32>() else {
            let options = ErrorOptions {
                title: "Invalid project".to_string(),
                message: format!("{raw:?} is not a project id."),
                retry_label: None,
            };
            ctx.commit_to(DETAIL, &error_state(&options))?;
            return Ok(());
        };

        load(self.data.clone(), ctx, id).await;
        Ok(())
    }
}

fn load(data: Rc<dyn DataSource>, ctx: PageContext, id: u32) -> LocalBoxFuture<'static, ()> {
    async move {
        let project = match data.project(id).await {
            Ok(project) => project,
            Err(e) => {
                let reload_data = data.clone();
                let shown = show_fetch_error(&ctx, DETAIL, "Project unavailable", &e, move |ctx| {
                    load(reload_data.clone(), ctx, id)
                });
                if let Err(e) = shown {
                    tracing::warn!(id, error = %e, "Failed to show project error state");
                }
                return;
            }
        };

        match ctx.commit_to(DETAIL, &project_detail(&project)) {
            Ok(outcome) if outcome.is_committed() => {}
            Ok(_) => return,
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to render project");
                return;
            }
        }

        // Activity never blocks the page: on failure the section goes away.
        let section = match data.project_activity(id).await {
            Ok(entries) => activity_list(&entries),
            Err(e) => {
                debug!(id, error = %e, "Activity unavailable, hiding section");
                SafeFragment::empty()
            }
        };
        if let Err(e) = ctx.commit_to(ACTIVITY, &section) {
            tracing::warn!(id, error = %e, "Failed to render project activity");
        }
    }
    .boxed_local()
}

fn project_detail(project: &Project) -> SafeFragment {
    let list = SkeletonOptions {
        rows: 2,
        label: "Loading activity".to_string(),
    };
    let origin = project
        .idea_id
        .map(|idea| html!("<dt>From idea</dt><dd><a href=\"#/ideas\">#" {idea} "</a></dd>"));
    html!(
        "<header class=\"page-header\">"
        "<h1>" {project.name} "</h1>"
        {project.status.badge()}
        "</header>"
        "<p class=\"description\">" {project.description} "</p>"
        "<dl class=\"facts\">"
        "<dt>Owner</dt><dd>" {project.owner} "</dd>"
        "<dt>Budget</dt><dd>" {format_currency(project.budget)} "</dd>"
        "<dt>Progress</dt><dd>" {project.progress} "%</dd>"
        {origin}
        "</dl>"
        "<section class=\"panel\"><h2>Activity</h2>"
        "<div id=\"project-activity\">" {skeleton(SkeletonKind::List, &list)} "</div>"
        "</section>"
    )
}

fn activity_list(entries: &[Activity]) -> SafeFragment {
    if entries.is_empty() {
        return empty_state(&EmptyOptions {
            title: "No activity yet".to_string(),
            ..EmptyOptions::default()
        });
    }
    let items: Vec<SafeFragment> = entries
        .iter()
        .map(|entry| html!("<li><time>" {entry.at} "</time> " {entry.message} "</li>"))
        .collect();
    html!("<ol class=\"activity\">" {items} "</ol>")
}
