pub mod bookmark;
pub mod item;
pub mod preferences;
pub mod tab;

pub use bookmark::{BookmarkId, BookmarkNode};
pub use item::{Item, ItemId, ItemKind};
pub use preferences::{KeyboardMode, Preferences, PreferencesStorage, Theme};
pub use tab::{Tab, TabId, TabUpdate, Window, WindowId};
