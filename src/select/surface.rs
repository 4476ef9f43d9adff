use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::style::{Attribute, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};

/// Minimal terminal surface the selector renders through. Frames are
/// redrawn in place by moving the cursor up over the previous frame and
/// clearing downward; no alternate screen.
pub trait Surface {
    fn line(&mut self, text: &str, selected: bool) -> Result<()>;
    fn move_up(&mut self, rows: u16) -> Result<()>;
    fn clear_down(&mut self) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

/// Real terminal output. Lines end with `\r\n` because the caller holds the
/// terminal in raw mode.
pub struct StdoutSurface {
    out: io::Stdout,
}

impl StdoutSurface {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StdoutSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for StdoutSurface {
    fn line(&mut self, text: &str, selected: bool) -> Result<()> {
        if selected {
            queue!(self.out, SetAttribute(Attribute::Reverse)).context("set attribute")?;
            write!(self.out, "{}", text).context("write line")?;
            queue!(self.out, SetAttribute(Attribute::Reset)).context("reset attribute")?;
        } else {
            write!(self.out, "{}", text).context("write line")?;
        }
        write!(self.out, "\r\n").context("write line ending")?;
        Ok(())
    }

    fn move_up(&mut self, rows: u16) -> Result<()> {
        if rows > 0 {
            queue!(self.out, cursor::MoveUp(rows), cursor::MoveToColumn(0))
                .context("move cursor up")?;
        }
        Ok(())
    }

    fn clear_down(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::FromCursorDown)).context("clear down")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush().context("flush stdout")?;
        Ok(())
    }
}

/// In-memory surface for headless tests: tracks a cursor row over a line
/// buffer the same way the terminal does.
#[derive(Debug, Default)]
pub struct BufferSurface {
    pub lines: Vec<String>,
    row: usize,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for BufferSurface {
    fn line(&mut self, text: &str, selected: bool) -> Result<()> {
        let rendered = if selected {
            format!("[{}]", text)
        } else {
            text.to_string()
        };
        if self.row < self.lines.len() {
            self.lines[self.row] = rendered;
        } else {
            self.lines.push(rendered);
        }
        self.row += 1;
        Ok(())
    }

    fn move_up(&mut self, rows: u16) -> Result<()> {
        self.row = self.row.saturating_sub(usize::from(rows));
        Ok(())
    }

    fn clear_down(&mut self) -> Result<()> {
        self.lines.truncate(self.row);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
