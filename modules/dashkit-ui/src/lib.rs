//! Page-level building blocks consumed by page modules: loading, error and
//! empty states, dialogs, icons, status badges and the data-fetch error type.

pub mod data;
pub mod dialog;
pub mod icon;
pub mod state;
pub mod status;

pub use data::{DataFetchError, FetchResult};
pub use dialog::{close_dialog, dialog, is_dialog_open, open_dialog, set_dialog_body, CLOSE_SELECTOR};
pub use icon::Icon;
pub use state::{
    empty_state, error_state, skeleton, EmptyOptions, ErrorOptions, SkeletonKind, SkeletonOptions,
    RETRY_SELECTOR,
};
pub use status::Status;
