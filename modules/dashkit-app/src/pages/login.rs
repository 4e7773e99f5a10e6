use async_trait::async_trait;
use dashkit_html::{attr_opt, html, SafeFragment};
use dashkit_router::{NavParams, PageContext, PageModule};

use super::DASHBOARD;

const FORM: &str = "#login-form";

/// Standalone sign-in form. Submitting goes to `?next=` or the dashboard.
pub struct LoginPage;

#[async_trait(?Send)]
impl PageModule for LoginPage {
    fn render(&self, params: &NavParams) -> Option<SafeFragment> {
        Some(html!(
            "<section class=\"auth-card\">"
            "<h1>Sign in</h1>"
            "<form id=\"login-form\" method=\"post\"" {attr_opt("data-next", params.get("next"))} ">"
            "<label>Email <input type=\"email\" name=\"email\" required></label>"
            "<label>Password <input type=\"password\" name=\"password\" required></label>"
            "<button type=\"submit\" class=\"btn btn-primary\">Continue</button>"
            "</form>"
            "</section>"
        ))
    }

    async fn init(&self, ctx: PageContext) -> anyhow::Result<()> {
        let next = ctx.param("next").unwrap_or(DASHBOARD).to_string();
        let submit_ctx = ctx.clone();
        ctx.on(FORM, "submit", move |_| {
            if let Err(e) = submit_ctx.navigator().navigate_href(&next) {
                tracing::warn!(next = %next, error = %e, "Failed to leave login page");
            }
        })?;
        Ok(())
    }
}
