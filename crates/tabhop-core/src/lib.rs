pub mod browser;
pub mod config;
pub mod constants;
pub mod data_source;
pub mod dispatcher;
pub mod error;
pub mod list;
pub mod models;
pub mod navigator;
pub mod search;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the types most callers need at crate root for convenience
pub use browser::{BookmarkService, PopupHost, TabService, WindowService};
pub use error::{BrowserError, PreferencesError};
pub use list::{RenderedList, RenderedRow};
pub use models::{Item, ItemId, ItemKind, TabId, WindowId};
