//! Line-driven navigation session.
//!
//! Each line is a command: a location (`#/ideas?status=active`), `back`,
//! `forward`, `click <selector>`, `submit <selector>`, `show` or `quit`.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use dashkit_router::{Navigation, Router, CONTENT_SLOT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(String),
    Back,
    Forward,
    /// Dispatch `event` on the first match of `selector`.
    Dispatch { event: &'static str, selector: String },
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let command = match word {
            "" => bail!("empty command"),
            "back" => Command::Back,
            "forward" => Command::Forward,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "click" | "submit" => {
                if rest.is_empty() {
                    bail!("{word} needs a selector");
                }
                let event = if word == "click" { "click" } else { "submit" };
                Command::Dispatch {
                    event,
                    selector: rest.to_string(),
                }
            }
            "go" if !rest.is_empty() => Command::Go(rest.to_string()),
            _ => Command::Go(line.to_string()),
        };
        Ok(command)
    }
}

pub const HELP: &str = "\
commands:
  #/<route>?<params>   navigate (also: go <href>, or a bare route key)
  back | forward       walk history
  click <selector>     dispatch a click
  submit <selector>    dispatch a submit
  show                 print the whole document
  quit";

/// What the caller should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Print(String),
    Quit,
}

pub struct Session {
    router: Router,
    /// How long to let handler-spawned work run after a dispatch.
    settle: Duration,
}

impl Session {
    pub fn new(router: Router, settle: Duration) -> Self {
        Self { router, settle }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub async fn run_line(&self, line: &str) -> Result<Step> {
        let command: Command = line.parse()?;
        self.execute(command).await
    }

    pub async fn execute(&self, command: Command) -> Result<Step> {
        match command {
            Command::Go(href) => {
                let navigation = self
                    .router
                    .navigate_href(&href)
                    .with_context(|| format!("Failed to navigate to {href}"))?;
                self.settle_navigation(navigation).await
            }
            Command::Back => match self.router.back()? {
                Some(navigation) => self.settle_navigation(navigation).await,
                None => Ok(Step::Print("(no earlier page)".to_string())),
            },
            Command::Forward => match self.router.forward()? {
                Some(navigation) => self.settle_navigation(navigation).await,
                None => Ok(Step::Print("(no later page)".to_string())),
            },
            Command::Dispatch { event, selector } => {
                let handled = self.router.dom().trigger(&selector, event)?;
                if handled == 0 {
                    return Ok(Step::Print(format!("(no {event} handler for {selector})")));
                }
                tokio::time::sleep(self.settle).await;
                Ok(Step::Print(self.snapshot()?))
            }
            Command::Show => Ok(Step::Print(self.router.dom().to_html())),
            Command::Help => Ok(Step::Print(HELP.to_string())),
            Command::Quit => Ok(Step::Quit),
        }
    }

    async fn settle_navigation(&self, navigation: Navigation) -> Result<Step> {
        let redirect = navigation
            .redirected_from()
            .map(|from| format!(" (redirected from {from})"))
            .unwrap_or_default();
        navigation.settled().await;
        let mut out = format!("{}{redirect}\n", self.router.dom().title());
        out.push_str(&self.snapshot()?);
        Ok(Step::Print(out))
    }

    /// Current location plus the page content markup.
    fn snapshot(&self) -> Result<String> {
        let location = self
            .router
            .current_location()
            .map(|location| location.to_href())
            .unwrap_or_default();
        let dom = self.router.dom().borrow();
        let content = match dom.query(CONTENT_SLOT)? {
            Some(slot) => dom.inner_html(slot)?,
            None => String::new(),
        };
        Ok(format!("[{location}]\n{content}"))
    }
}
