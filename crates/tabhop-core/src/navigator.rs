//! Active-row cursor movement over the rendered list.
//!
//! Next/Previous wrap around, PageUp/PageDown clamp, Home/End jump. Every
//! move reports how the new active row should be scrolled into view.

use crate::constants::PAGE_SIZE;
use crate::list::RenderedList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Next,
    Previous,
    Home,
    End,
    PageUp,
    PageDown,
}

impl Movement {
    /// Scroll alignment the UI must use after this move
    pub fn scroll_align(&self) -> ScrollAlign {
        match self {
            Movement::Next | Movement::Previous => ScrollAlign::Center,
            Movement::Home | Movement::End => ScrollAlign::Nearest,
            Movement::PageUp => ScrollAlign::Start,
            Movement::PageDown => ScrollAlign::End,
        }
    }
}

/// Where the newly active row should sit in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Middle of the viewport
    Center,
    /// Scroll as little as possible
    Nearest,
    /// Top edge
    Start,
    /// Bottom edge
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moved {
    pub index: usize,
    pub align: ScrollAlign,
}

/// Index the cursor would land on, without touching the list
pub fn target_index(len: usize, current: usize, movement: Movement) -> usize {
    let last = len - 1;
    match movement {
        Movement::Next => {
            if current >= last {
                0
            } else {
                current + 1
            }
        }
        Movement::Previous => {
            if current == 0 {
                last
            } else {
                current - 1
            }
        }
        Movement::Home => 0,
        Movement::End => last,
        Movement::PageUp => current.saturating_sub(PAGE_SIZE),
        Movement::PageDown => (current + PAGE_SIZE).min(last),
    }
}

/// Apply `movement` to the list's active row.
///
/// Lists with fewer than two rows never move. A list without an active row
/// is treated as if its first row were active.
pub fn move_active(list: &mut RenderedList, movement: Movement) -> Option<Moved> {
    if list.len() < 2 {
        return None;
    }
    let current = list.active_index().unwrap_or(0);
    let index = target_index(list.len(), current, movement);
    list.set_active(index);
    Some(Moved {
        index,
        align: movement.scroll_align(),
    })
}
