use dashkit_html::{html, SafeFragment};
use serde::{Deserialize, Serialize};

/// Inline SVG icons used by the chrome and the state fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Dashboard,
    Lightbulb,
    Folder,
    Users,
    CreditCard,
    Alert,
    Inbox,
    Close,
}

impl Icon {
    pub fn name(self) -> &'static str {
        match self {
            Icon::Dashboard => "dashboard",
            Icon::Lightbulb => "lightbulb",
            Icon::Folder => "folder",
            Icon::Users => "users",
            Icon::CreditCard => "credit-card",
            Icon::Alert => "alert",
            Icon::Inbox => "inbox",
            Icon::Close => "close",
        }
    }

    pub fn render(self) -> SafeFragment {
        let path = match self {
            Icon::Dashboard => html!("<path d=\"M3 3h8v8H3zM13 3h8v5h-8zM13 10h8v11h-8zM3 13h8v8H3z\"/>"),
            Icon::Lightbulb => html!("<path d=\"M9 18h6M10 22h4M12 2a7 7 0 0 0-4 12.7V17h8v-2.3A7 7 0 0 0 12 2z\"/>"),
            Icon::Folder => html!("<path d=\"M3 6h6l2 2h10v11H3z\"/>"),
            Icon::Users => html!("<circle cx=\"9\" cy=\"8\" r=\"4\"/><path d=\"M2 21v-2a5 5 0 0 1 5-5h4a5 5 0 0 1 5 5v2M17 11a3 3 0 1 0 0-6M22 21v-2a4 4 0 0 0-3-3.9\"/>"),
            Icon::CreditCard => html!("<rect x=\"2\" y=\"5\" width=\"20\" height=\"14\" rx=\"2\"/><path d=\"M2 10h20\"/>"),
            Icon::Alert => html!("<path d=\"M12 3 2 21h20zM12 9v5M12 17v.01\"/>"),
            Icon::Inbox => html!("<path d=\"M3 13h5l2 3h4l2-3h5M5 5h14l2 8v6H3v-6z\"/>"),
            Icon::Close => html!("<path d=\"M6 6l12 12M18 6 6 18\"/>"),
        };
        html!(
            "<svg class=\"icon icon-" {self.name()} "\" viewBox=\"0 0 24 24\" width=\"16\" height=\"16\" fill=\"none\" stroke=\"currentColor\" stroke-width=\"2\" aria-hidden=\"true\">"
            {path}
            "</svg>"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_markup_names_the_icon() {
        let svg = Icon::CreditCard.render();
        assert!(svg.as_str().starts_with("<svg class=\"icon icon-credit-card\""));
        assert!(svg.as_str().ends_with("</svg>"));
    }

    #[test]
    fn icons_deserialize_from_kebab_case() {
        let icon: Icon = serde_json::from_str("\"credit-card\"").unwrap();
        assert_eq!(icon, Icon::CreditCard);
    }
}
