use std::ops::Range;

pub const MAX_VISIBLE: usize = 6;

/// Horizontal window over a movie list that wraps around at both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slider {
    index: usize,
    items_to_show: usize,
    len: usize,
}

impl Slider {
    pub fn new(len: usize, items_to_show: usize) -> Self {
        Self {
            index: 0,
            items_to_show: items_to_show.min(len),
            len,
        }
    }

    /// Home-page slider: at most six cards.
    pub fn for_home(len: usize) -> Self {
        Self::new(len, MAX_VISIBLE)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items_to_show(&self) -> usize {
        self.items_to_show
    }

    pub fn next(&mut self) {
        self.index = if self.index + self.items_to_show >= self.len {
            0
        } else {
            self.index + 1
        };
    }

    pub fn prev(&mut self) {
        self.index = if self.index == 0 {
            self.len - self.items_to_show
        } else {
            self.index - 1
        };
    }

    pub fn visible(&self) -> Range<usize> {
        self.index..(self.index + self.items_to_show).min(self.len)
    }
}
