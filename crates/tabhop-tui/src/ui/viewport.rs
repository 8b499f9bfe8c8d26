use tabhop_core::navigator::ScrollAlign;

/// Visible window over the rendered list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Index of the first visible row
    pub offset: usize,
    /// Number of rows that fit on screen
    pub height: usize,
}

impl Viewport {
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Resize, keeping `active` on screen
    pub fn set_height(&mut self, height: usize, active: Option<usize>, len: usize) {
        if self.height == height {
            return;
        }
        self.height = height;
        match active {
            Some(index) => self.scroll_into_view(index, ScrollAlign::Nearest, len),
            None => self.offset = self.offset.min(self.max_offset(len)),
        }
    }

    fn max_offset(&self, len: usize) -> usize {
        len.saturating_sub(self.height)
    }

    /// Move the window so row `index` of a `len`-row list sits where `align` asks
    pub fn scroll_into_view(&mut self, index: usize, align: ScrollAlign, len: usize) {
        if self.height == 0 {
            self.offset = index;
            return;
        }

        let offset = match align {
            ScrollAlign::Start => index,
            ScrollAlign::End => (index + 1).saturating_sub(self.height),
            ScrollAlign::Center => index.saturating_sub(self.height / 2),
            ScrollAlign::Nearest => {
                if index < self.offset {
                    index
                } else if index >= self.offset + self.height {
                    index + 1 - self.height
                } else {
                    self.offset
                }
            }
        };
        self.offset = offset.min(self.max_offset(len));
    }

    /// Row indices currently on screen
    pub fn visible(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(len);
        start..(start + self.height).min(len)
    }
}
