//! Hash-location router for single-page dashboards.
//!
//! A [`PageRegistry`] maps route keys to titles and layouts; a [`Router`]
//! mounts the layout shell, renders the page, and runs its async `init` on
//! the current `LocalSet`. Navigation generations keep slow pages from
//! writing over newer ones.

pub mod error;
pub mod guard;
pub mod history;
pub mod options;
pub mod page;
pub mod params;
pub mod registry;
pub mod router;
pub mod shell;

pub use error::{RouterError, RouterResult};
pub use guard::Generation;
pub use history::History;
pub use options::RouterOptions;
pub use page::{CommitOutcome, PageContext, PageModule};
pub use params::{Location, NavParams};
pub use registry::{is_route_key, Layout, PageRegistry, RegistryBuilder, RouteDef, RouteEntry};
pub use router::{Navigation, Navigator, Router, RouterBuilder, RouterState};
pub use shell::{render_shell, CONTENT_SLOT};
