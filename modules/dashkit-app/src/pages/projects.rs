use std::rc::Rc;

use async_trait::async_trait;
use dashkit_html::{attr, html, SafeFragment};
use dashkit_router::{Location, NavParams, PageContext, PageModule};
use dashkit_ui::{empty_state, skeleton, EmptyOptions, Icon, SkeletonKind, SkeletonOptions};
use futures::future::LocalBoxFuture;
use futures::FutureExt;

use super::dashboard::format_currency;
use super::{page_header, show_fetch_error, PROJECT_DETAIL};
use crate::data::{DataSource, Project};

const TABLE: &str = "#project-table";

pub struct ProjectsPage {
    data: Rc<dyn DataSource>,
}

impl ProjectsPage {
    pub fn new(data: Rc<dyn DataSource>) -> Self {
        Self { data }
    }
}

#[async_trait(?Send)]
impl PageModule for ProjectsPage {
    fn render(&self, _params: &NavParams) -> Option<SafeFragment> {
        let options = SkeletonOptions {
            rows: 5,
            label: "Loading projects".to_string(),
        };
        Some(html!(
            {page_header("Projects", "Everything in flight")}
            "<div id=\"project-table\">" {skeleton(SkeletonKind::Table, &options)} "</div>"
        ))
    }

    async fn init(&self, ctx: PageContext) -> anyhow::Result<()> {
        load(self.data.clone(), ctx).await;
        Ok(())
    }
}

fn load(data: Rc<dyn DataSource>, ctx: PageContext) -> LocalBoxFuture<'static, ()> {
    async move {
        let result = match data.projects().await {
            Ok(projects) => ctx
                .commit_to(TABLE, &project_table(&projects))
                .and_then(|_| follow_links(&ctx)),
            Err(e) => {
                let reload_data = data.clone();
                show_fetch_error(&ctx, TABLE, "Projects unavailable", &e, move |ctx| {
                    load(reload_data.clone(), ctx)
                })
                .map(|_| ())
            }
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to render projects");
        }
    }
    .boxed_local()
}

/// Row links navigate through the router instead of the host.
fn follow_links(ctx: &PageContext) -> dashkit_router::RouterResult<()> {
    let link_ctx = ctx.clone();
    ctx.on(TABLE, "click", move |event| {
        let href = link_ctx.document().attr(event.target, "href").ok().flatten();
        let Some(href) = href else {
            return;
        };
        if let Err(e) = link_ctx.navigator().navigate_href(&href) {
            tracing::warn!(href = %href, error = %e, "Failed to follow project link");
        }
    })?;
    Ok(())
}

fn project_table(projects: &[Project]) -> SafeFragment {
    if projects.is_empty() {
        return empty_state(&EmptyOptions {
            icon: Icon::Folder,
            title: "No projects yet".to_string(),
            message: "Promote an idea to start one.".to_string(),
        });
    }
    let rows: Vec<SafeFragment> = projects.iter().map(project_row).collect();
    html!(
        "<table class=\"table\">"
        "<thead><tr><th>Name</th><th>Owner</th><th>Status</th><th>Progress</th><th>Budget</th></tr></thead>"
        "<tbody>" {rows} "</tbody>"
        "</table>"
    )
}

fn project_row(project: &Project) -> SafeFragment {
    let href = Location::new(PROJECT_DETAIL, NavParams::new().with("id", project.id.to_string())).to_href();
    html!(
        "<tr>"
        "<td><a" {attr("href", &href)} {attr("data-project-id", &project.id)} ">" {project.name} "</a></td>"
        "<td>" {project.owner} "</td>"
        "<td>" {project.status.badge()} "</td>"
        "<td><progress max=\"100\"" {attr("value", &project.progress)} "></progress> " {project.progress} "%</td>"
        "<td>" {format_currency(project.budget)} "</td>"
        "</tr>"
    )
}
