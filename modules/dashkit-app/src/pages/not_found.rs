use async_trait::async_trait;
use dashkit_html::{html, SafeFragment};
use dashkit_router::{NavParams, PageContext, PageModule};
use dashkit_ui::Icon;

use super::DASHBOARD;

pub struct NotFoundPage;

#[async_trait(?Send)]
impl PageModule for NotFoundPage {
    fn render(&self, params: &NavParams) -> Option<SafeFragment> {
        let requested = params
            .get("path")
            .map(|path| html!("<p>No page is registered as <code>" {path} "</code>.</p>"));
        Some(html!(
            "<section class=\"not-found\">"
            {Icon::Alert.render()}
            "<h1>Page not found</h1>"
            {requested}
            "<a class=\"btn btn-primary\" href=\"#/" {DASHBOARD} "\">Back to the dashboard</a>"
            "</section>"
        ))
    }

    async fn init(&self, _ctx: PageContext) -> anyhow::Result<()> {
        Ok(())
    }
}
