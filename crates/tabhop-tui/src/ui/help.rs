use crossterm::event::KeyCode;
use tabhop_core::models::KeyboardMode;

use crate::ui::keymap;

/// Modal key reference. While open it swallows every key.
#[derive(Debug, Clone)]
pub struct HelpOverlay {
    pub mode: KeyboardMode,
    pub lines: Vec<(String, String)>,
    pub scroll: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpOutcome {
    Stay,
    Close,
}

impl HelpOverlay {
    pub fn new(mode: KeyboardMode) -> Self {
        Self {
            mode,
            lines: keymap::generate_help(mode),
            scroll: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> HelpOutcome {
        match key {
            KeyCode::Esc => return HelpOutcome::Close,
            KeyCode::Down => {
                if self.scroll + 1 < self.lines.len() {
                    self.scroll += 1;
                }
            }
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            _ => {}
        }
        HelpOutcome::Stay
    }
}
