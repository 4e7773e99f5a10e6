use std::rc::Rc;

use async_trait::async_trait;
use dashkit_html::{attr, html, Render, SafeFragment};
use dashkit_router::{NavParams, PageContext, PageModule};
use dashkit_ui::{skeleton, Icon, SkeletonKind, SkeletonOptions, Status};
use futures::future::{join, LocalBoxFuture};
use futures::FutureExt;

use super::{page_header, show_fetch_error, PROJECT_DETAIL};
use crate::data::{DataSource, Idea, Project};

const SUMMARY: &str = "#summary";
const RECENT: &str = "#recent-projects";

/// Landing page: headline numbers and the most recently active projects.
pub struct DashboardPage {
    data: Rc<dyn DataSource>,
}

impl DashboardPage {
    pub fn new(data: Rc<dyn DataSource>) -> Self {
        Self { data }
    }
}

#[async_trait(?Send)]
impl PageModule for DashboardPage {
    fn render(&self, _params: &NavParams) -> Option<SafeFragment> {
        let cards = SkeletonOptions {
            rows: 4,
            label: "Loading summary".to_string(),
        };
        let list = SkeletonOptions {
            rows: 3,
            label: "Loading projects".to_string(),
        };
        Some(html!(
            {page_header("Dashboard", "Where ideas and projects stand today")}
            "<section id=\"summary\" class=\"stat-grid\">" {skeleton(SkeletonKind::Cards, &cards)} "</section>"
            "<section class=\"panel\"><h2>Recent projects</h2>"
            "<div id=\"recent-projects\">" {skeleton(SkeletonKind::List, &list)} "</div>"
            "</section>"
        ))
    }

    async fn init(&self, ctx: PageContext) -> anyhow::Result<()> {
        load(self.data.clone(), ctx).await;
        Ok(())
    }
}

fn load(data: Rc<dyn DataSource>, ctx: PageContext) -> LocalBoxFuture<'static, ()> {
    async move {
        let (ideas, projects) = join(data.ideas(), data.projects()).await;
        let result = match (ideas, projects) {
            (Ok(ideas), Ok(projects)) => ctx
                .commit_to(SUMMARY, &summary(&ideas, &projects))
                .and_then(|_| ctx.commit_to(RECENT, &recent(&projects))),
            (Err(e), _) | (_, Err(e)) => {
                let reload_data = data.clone();
                show_fetch_error(&ctx, SUMMARY, "Summary unavailable", &e, move |ctx| {
                    load(reload_data.clone(), ctx)
                })
                .and_then(|_| ctx.commit_to(RECENT, &SafeFragment::empty()))
            }
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to render dashboard");
        }
    }
    .boxed_local()
}

fn summary(ideas: &[Idea], projects: &[Project]) -> SafeFragment {
    let open_ideas = ideas
        .iter()
        .filter(|idea| !matches!(idea.status, Status::Done | Status::Archived))
        .count();
    let active = projects.iter().filter(|p| p.status == Status::Active).count();
    let blocked = projects.iter().filter(|p| p.status == Status::Blocked).count();
    let budget: f64 = projects.iter().map(|p| p.budget).sum();

    html!(
        {stat_card(Icon::Lightbulb, "Open ideas", &open_ideas)}
        {stat_card(Icon::Folder, "Active projects", &active)}
        {stat_card(Icon::Alert, "Blocked", &blocked)}
        {stat_card(Icon::CreditCard, "Total budget", &format_currency(budget))}
    )
}

fn stat_card<T: Render + ?Sized>(icon: Icon, label: &str, value: &T) -> SafeFragment {
    html!(
        "<div class=\"stat-card\">"
        {icon.render()}
        "<span class=\"stat-label\">" {label} "</span>"
        "<strong class=\"stat-value\">" {value} "</strong>"
        "</div>"
    )
}

fn recent(projects: &[Project]) -> SafeFragment {
    let mut sorted: Vec<&Project> = projects.iter().collect();
    sorted.sort_by(|a, b| b.progress.cmp(&a.progress).then(a.id.cmp(&b.id)));
    let rows: Vec<SafeFragment> = sorted
        .into_iter()
        .filter(|p| p.status != Status::Archived)
        .take(5)
        .map(|project| {
            let href = format!("#/{PROJECT_DETAIL}?id={}", project.id);
            html!(
                "<li class=\"recent-row\">"
                "<a" {attr("href", &href)} ">" {project.name} "</a>"
                {project.status.badge()}
                "<span class=\"progress\">" {project.progress} "%</span>"
                "</li>"
            )
        })
        .collect();
    html!("<ul class=\"recent-list\">" {rows} "</ul>")
}

/// Whole-dollar amount with thousands separators.
pub(crate) fn format_currency(amount: f64) -> String {
    let dollars = amount.round() as i64;
    let digits = dollars.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if dollars < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
