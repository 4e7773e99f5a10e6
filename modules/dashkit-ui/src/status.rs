use dashkit_html::{html, SafeFragment};
use serde::{Deserialize, Serialize};

/// Workflow status shared by ideas, projects and invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Draft,
    Active,
    Pending,
    Blocked,
    Done,
    Archived,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Draft,
        Status::Active,
        Status::Pending,
        Status::Blocked,
        Status::Done,
        Status::Archived,
    ];

    /// Lowercase key as used in config, fixtures and query strings.
    pub fn key(self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Active => "active",
            Status::Pending => "pending",
            Status::Blocked => "blocked",
            Status::Done => "done",
            Status::Archived => "archived",
        }
    }

    pub fn parse(key: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|status| status.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Draft => "Draft",
            Status::Active => "Active",
            Status::Pending => "Pending",
            Status::Blocked => "Blocked",
            Status::Done => "Done",
            Status::Archived => "Archived",
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Status::Draft => "badge-muted",
            Status::Active => "badge-blue",
            Status::Pending => "badge-amber",
            Status::Blocked => "badge-red",
            Status::Done => "badge-green",
            Status::Archived => "badge-muted",
        }
    }

    pub fn badge(self) -> SafeFragment {
        html!("<span class=\"badge " {self.class()} "\">" {self.label()} "</span>")
    }
}
