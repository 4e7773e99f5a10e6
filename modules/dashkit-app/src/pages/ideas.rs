use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use dashkit_html::{attr, class_list, html, SafeFragment};
use dashkit_router::{NavParams, PageContext, PageModule};
use dashkit_ui::{
    close_dialog, dialog, empty_state, open_dialog, set_dialog_body, skeleton, EmptyOptions, Icon,
    SkeletonKind, SkeletonOptions, Status, CLOSE_SELECTOR,
};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use tracing::debug;

use super::{page_header, show_fetch_error, IDEAS};
use crate::data::{DataSource, Idea};

pub const IDEA_DIALOG: &str = "idea-dialog";
const LIST: &str = "#idea-list";

/// Per-visit state. Replaced wholesale at the start of every `init`.
#[derive(Debug, Default)]
struct IdeasState {
    filter: Option<Status>,
    ideas: Vec<Idea>,
    selected: Option<u32>,
}

/// Idea backlog with a status filter and a detail dialog.
pub struct IdeasPage {
    data: Rc<dyn DataSource>,
    state: Rc<RefCell<IdeasState>>,
}

impl IdeasPage {
    pub fn new(data: Rc<dyn DataSource>) -> Self {
        Self {
            data,
            state: Rc::default(),
        }
    }

    /// Idea currently shown in the dialog.
    pub fn selected(&self) -> Option<u32> {
        self.state.borrow().selected
    }

    /// Ideas loaded by the current visit, after filtering.
    pub fn visible(&self) -> Vec<u32> {
        let state = self.state.borrow();
        filtered(&state.ideas, state.filter).map(|idea| idea.id).collect()
    }
}

#[async_trait(?Send)]
impl PageModule for IdeasPage {
    fn render(&self, params: &NavParams) -> Option<SafeFragment> {
        let active = params.get("status").and_then(Status::parse);
        let options = SkeletonOptions {
            rows: 4,
            label: "Loading ideas".to_string(),
        };
        Some(html!(
            {page_header("Ideas", "Proposals waiting for a decision")}
            {filter_bar(active)}
            "<div id=\"idea-list\">" {skeleton(SkeletonKind::List, &options)} "</div>"
            {dialog(IDEA_DIALOG, "Idea", &SafeFragment::empty())}
        ))
    }

    async fn init(&self, ctx: PageContext) -> anyhow::Result<()> {
        *self.state.borrow_mut() = IdeasState {
            filter: ctx.param("status").and_then(Status::parse),
            ..IdeasState::default()
        };
        load(self.data.clone(), self.state.clone(), ctx).await;
        Ok(())
    }
}

fn load(
    data: Rc<dyn DataSource>,
    state: Rc<RefCell<IdeasState>>,
    ctx: PageContext,
) -> LocalBoxFuture<'static, ()> {
    async move {
        let ideas = match data.ideas().await {
            Ok(ideas) => ideas,
            Err(e) => {
                let (reload_data, reload_state) = (data.clone(), state.clone());
                let shown = show_fetch_error(&ctx, LIST, "Ideas unavailable", &e, move |ctx| {
                    load(reload_data.clone(), reload_state.clone(), ctx)
                });
                if let Err(e) = shown {
                    tracing::warn!(error = %e, "Failed to show ideas error state");
                }
                return;
            }
        };

        if !ctx.is_current() {
            return;
        }
        let list = {
            let mut state = state.borrow_mut();
            state.ideas = ideas;
            idea_list(&state.ideas, state.filter)
        };
        if let Err(e) = ctx.commit_to(LIST, &list).and_then(|_| wire(&ctx, &state)) {
            tracing::warn!(error = %e, "Failed to render ideas");
        }
    }
    .boxed_local()
}

/// Delegated listeners: one on the list for every "open" button, one on
/// the dialog close button.
fn wire(ctx: &PageContext, state: &Rc<RefCell<IdeasState>>) -> dashkit_router::RouterResult<()> {
    let (open_ctx, open_state) = (ctx.clone(), state.clone());
    ctx.on(LIST, "click", move |event| {
        let id = open_ctx
            .document()
            .attr(event.target, "data-idea-id")
            .ok()
            .flatten()
            .and_then(|raw| raw.parse::<u32>().ok());
        let Some(id) = id else {
            return;
        };
        let detail = {
            let mut state = open_state.borrow_mut();
            state.selected = Some(id);
            state.ideas.iter().find(|idea| idea.id == id).map(idea_detail)
        };
        let Some(detail) = detail else {
            debug!(id, "Clicked idea is not loaded");
            return;
        };
        let opened = open_ctx.update(|doc| {
            set_dialog_body(doc, IDEA_DIALOG, &detail)?;
            open_dialog(doc, IDEA_DIALOG)
        });
        if let Some(Err(e)) = opened {
            tracing::warn!(id, error = %e, "Failed to open idea dialog");
        }
    })?;

    let (close_ctx, close_state) = (ctx.clone(), state.clone());
    let close_button = format!("#{IDEA_DIALOG} {CLOSE_SELECTOR}");
    ctx.on(&close_button, "click", move |_| {
        close_state.borrow_mut().selected = None;
        if let Some(Err(e)) = close_ctx.update(|doc| close_dialog(doc, IDEA_DIALOG)) {
            tracing::warn!(error = %e, "Failed to close idea dialog");
        }
    })?;
    Ok(())
}

fn filtered(ideas: &[Idea], filter: Option<Status>) -> impl Iterator<Item = &Idea> {
    ideas
        .iter()
        .filter(move |idea| filter.map_or(true, |status| idea.status == status))
}

fn filter_bar(active: Option<Status>) -> SafeFragment {
    let all = html!(
        "<a href=\"#/" {IDEAS} "\" class=\"" {class_list(&[("chip", true), ("active", active.is_none())])} "\">All</a>"
    );
    let chips: Vec<SafeFragment> = Status::ALL
        .into_iter()
        .map(|status| {
            let href = format!("#/{IDEAS}?status={}", status.key());
            html!(
                "<a" {attr("href", &href)}
                " class=\"" {class_list(&[("chip", true), ("active", active == Some(status))])} "\">"
                {status.label()}
                "</a>"
            )
        })
        .collect();
    html!("<nav class=\"filter-bar\">" {all} {chips} "</nav>")
}

fn idea_list(ideas: &[Idea], filter: Option<Status>) -> SafeFragment {
    let rows: Vec<SafeFragment> = filtered(ideas, filter).map(idea_row).collect();
    if rows.is_empty() {
        return empty_state(&EmptyOptions {
            icon: Icon::Lightbulb,
            title: "No ideas match".to_string(),
            message: "Try another status filter.".to_string(),
        });
    }
    html!("<ul class=\"idea-list\">" {rows} "</ul>")
}

fn idea_row(idea: &Idea) -> SafeFragment {
    html!(
        "<li class=\"idea-row\">"
        "<div><strong>" {idea.title} "</strong>"
        "<p>" {idea.summary} "</p></div>"
        {idea.status.badge()}
        "<span class=\"score\">" {idea.score} "</span>"
        "<button type=\"button\" class=\"btn btn-link\"" {attr("data-idea-id", &idea.id)} ">Details</button>"
        "</li>"
    )
}

fn idea_detail(idea: &Idea) -> SafeFragment {
    html!(
        "<h3>" {idea.title} "</h3>"
        "<p>" {idea.summary} "</p>"
        "<dl>"
        "<dt>Owner</dt><dd>" {idea.owner} "</dd>"
        "<dt>Status</dt><dd>" {idea.status.badge()} "</dd>"
        "<dt>Score</dt><dd>" {idea.score} " / 100</dd>"
        "</dl>"
    )
}
