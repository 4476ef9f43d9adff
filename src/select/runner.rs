use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use super::hooks::SelectorHooks;
use super::state::{Key, PagedState, Step};
use super::surface::{StdoutSurface, Surface};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One-shot paged picker over a fixed item slice. Returns the selected
/// index, or `None` when the user cancelled.
pub struct PagedSelector<'a, T> {
    items: &'a [T],
    format: Box<dyn Fn(&T) -> Vec<String> + 'a>,
    page_size: usize,
    hooks: Option<&'a mut dyn SelectorHooks<T>>,
}

impl<'a, T> PagedSelector<'a, T> {
    pub fn new(items: &'a [T], format: impl Fn(&T) -> Vec<String> + 'a) -> Self {
        Self {
            items,
            format: Box::new(format),
            page_size: DEFAULT_PAGE_SIZE,
            hooks: None,
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Enables the `f` favorite-toggle key.
    pub fn hooks(mut self, hooks: &'a mut dyn SelectorHooks<T>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn run(mut self) -> Result<Option<usize>> {
        if self.items.is_empty() {
            return Ok(None);
        }
        if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
            return self.run_fallback();
        }
        self.run_raw()
    }

    fn run_raw(&mut self) -> Result<Option<usize>> {
        let mut surface = StdoutSurface::new();
        let guard = RawModeGuard::enable()?;
        let mut state = PagedState::new(self.items.len(), self.page_size);
        let mut last_lines: u16 = 0;

        let result = loop {
            render_frame(&mut surface, &state, self.items, &self.format, &mut last_lines)?;
            let key = read_key()?;
            match state.apply(key) {
                Step::Render | Step::Ignore => {}
                Step::Accept => break Some(state.selected()),
                Step::Cancel => break None,
                Step::Favorite => {
                    if let Some(hooks) = self.hooks.as_mut()
                        && let Err(err) = hooks.toggle_favorite(&self.items[state.selected()])
                    {
                        hooks.notify_failure("toggle favorite", &err);
                    }
                }
                Step::Interrupt => {
                    clear_frame(&mut surface, last_lines)?;
                    drop(guard);
                    // Raw mode is restored; leave through the conventional
                    // interrupt status.
                    std::process::exit(130);
                }
            }
        };

        clear_frame(&mut surface, last_lines)?;
        drop(guard);
        Ok(result)
    }

    /// Non-TTY degradation: a numbered single-choice list with a Cancel
    /// entry, one line per item.
    fn run_fallback(&self) -> Result<Option<usize>> {
        for (i, item) in self.items.iter().enumerate() {
            let lines = (self.format)(item);
            let first = lines.first().map(String::as_str).unwrap_or("");
            println!("{}) {}", i + 1, first);
        }
        println!("0) Cancel");

        let stdin = io::stdin();
        loop {
            print!("select> ");
            io::stdout().flush().context("flush prompt")?;
            let mut line = String::new();
            let read = stdin
                .lock()
                .read_line(&mut line)
                .context("read selection")?;
            if read == 0 {
                return Ok(None);
            }
            let line = line.trim();
            if line.is_empty() || line == "0" || line.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=self.items.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => println!("invalid selection: {}", line),
            }
        }
    }
}

/// Redraw the whole frame over the previous one. `last_lines` is updated to
/// the number of lines this frame occupies.
pub(super) fn render_frame<T>(
    surface: &mut dyn Surface,
    state: &PagedState,
    items: &[T],
    format: &dyn Fn(&T) -> Vec<String>,
    last_lines: &mut u16,
) -> Result<()> {
    surface.move_up(*last_lines)?;
    surface.clear_down()?;

    let mut printed: u16 = 0;
    let start = state.page_start();
    for (offset, item) in items[start..start + state.page_len()].iter().enumerate() {
        let index = start + offset;
        let lines = format(item);
        let first = lines.first().map(String::as_str).unwrap_or("");
        surface.line(
            &format!("{}. {}", offset + 1, first),
            index == state.selected(),
        )?;
        printed += 1;
        for cont in lines.iter().skip(1) {
            surface.line(&format!("   {}", cont), false)?;
            printed += 1;
        }
    }
    surface.line(
        &format!("page {}/{}", state.page() + 1, state.total_pages()),
        false,
    )?;
    printed += 1;

    *last_lines = printed;
    surface.flush()
}

fn clear_frame(surface: &mut dyn Surface, last_lines: u16) -> Result<()> {
    surface.move_up(last_lines)?;
    surface.clear_down()?;
    surface.flush()
}

fn read_key() -> Result<Key> {
    loop {
        let Event::Key(key) = event::read().context("read terminal event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') = key.code {
                return Ok(Key::Interrupt);
            }
            continue;
        }
        return Ok(match key.code {
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left | KeyCode::PageUp => Key::PageBack,
            KeyCode::Right | KeyCode::PageDown => Key::PageForward,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Char(c @ '1'..='9') => Key::Digit(c as u8 - b'0'),
            KeyCode::Char('f') | KeyCode::Char('F') => Key::ToggleFavorite,
            _ => continue,
        });
    }
}

/// Restores the terminal on scope exit, including error and interrupt
/// paths.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}
