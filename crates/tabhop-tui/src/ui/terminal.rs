use anyhow::Result;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use tracing::debug;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Kitty protocol flags the popup asks for. Modified Enter only arrives
/// with all keys reported as escape codes, and shifted characters only
/// arrive intact with their alternate keys.
fn enhancement_flags() -> KeyboardEnhancementFlags {
    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
}

/// Switch to raw mode on the alternate screen with mouse reporting.
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    if supports_keyboard_enhancement().unwrap_or(false) {
        if let Err(e) = execute!(stdout, PushKeyboardEnhancementFlags(enhancement_flags())) {
            debug!("Keyboard enhancement unavailable: {}", e);
        }
    } else {
        debug!("Terminal has no keyboard enhancement; modified Enter may be lost");
    }

    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Undo [`init`]. Also runs from the panic hook, so it must not assume
/// `init` got far.
pub fn restore() -> Result<()> {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shifted_keys_keep_their_alternates() {
        let flags = enhancement_flags();
        assert!(flags.contains(KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES));
        assert!(flags.contains(KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS));
    }
}
