/// Keys the selector reacts to, already decoded from terminal events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    /// Left arrow or PageUp.
    PageBack,
    /// Right arrow or PageDown.
    PageForward,
    /// `1`-`9`, quick-select within the current page.
    Digit(u8),
    Enter,
    Escape,
    /// `f`; only honored when a favorite hook was supplied.
    ToggleFavorite,
    /// Ctrl-C.
    Interrupt,
}

/// What the runner should do after feeding a key to the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Render,
    Accept,
    Cancel,
    Favorite,
    Interrupt,
    Ignore,
}

/// Selection cursor over a fixed item list, with the page index derived
/// from the selection after every move.
#[derive(Clone, Copy, Debug)]
pub struct PagedState {
    len: usize,
    page_size: usize,
    selected: usize,
}

impl PagedState {
    pub fn new(len: usize, page_size: usize) -> Self {
        Self {
            len,
            page_size: page_size.max(1),
            selected: 0,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn page(&self) -> usize {
        self.selected / self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.len.div_ceil(self.page_size).max(1)
    }

    pub fn page_start(&self) -> usize {
        self.page() * self.page_size
    }

    /// Number of items on the current page.
    pub fn page_len(&self) -> usize {
        (self.len - self.page_start()).min(self.page_size)
    }

    pub fn apply(&mut self, key: Key) -> Step {
        match key {
            Key::Up => {
                if self.selected == 0 {
                    return Step::Ignore;
                }
                self.selected -= 1;
                Step::Render
            }
            Key::Down => {
                if self.selected + 1 >= self.len {
                    return Step::Ignore;
                }
                self.selected += 1;
                Step::Render
            }
            Key::PageBack => {
                if self.page() == 0 {
                    return Step::Ignore;
                }
                let start = (self.page() - 1) * self.page_size;
                let end = start + self.page_size - 1;
                self.selected = self.selected.clamp(start, end);
                Step::Render
            }
            Key::PageForward => {
                if self.page() + 1 >= self.total_pages() {
                    return Step::Ignore;
                }
                let start = (self.page() + 1) * self.page_size;
                let end = (start + self.page_size - 1).min(self.len - 1);
                self.selected = self.selected.clamp(start, end);
                Step::Render
            }
            Key::Digit(d) => {
                if d == 0 || usize::from(d) > self.page_len() {
                    return Step::Ignore;
                }
                self.selected = self.page_start() + usize::from(d) - 1;
                Step::Render
            }
            Key::Enter => Step::Accept,
            Key::Escape => Step::Cancel,
            Key::ToggleFavorite => Step::Favorite,
            Key::Interrupt => Step::Interrupt,
        }
    }
}
