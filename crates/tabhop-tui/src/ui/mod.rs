pub mod app;
pub mod help;
pub mod keymap;
pub mod scheduler;
pub mod terminal;
pub mod theme;
pub mod viewport;

pub use app::App;
pub use terminal::{init as init_terminal, restore as restore_terminal, Tui};
