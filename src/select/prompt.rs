//! Line and yes/no prompts with Escape-to-cancel. Raw mode is held only
//! for the duration of one prompt and restored on every path; off-TTY the
//! prompts degrade to plain line reads (with no cancel key).

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Free-text prompt. `Ok(None)` means the user cancelled with Escape.
pub fn prompt_line(label: &str) -> Result<Option<String>> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return read_plain_line(label);
    }

    let mut out = io::stdout();
    write!(out, "{}: ", label).context("write prompt")?;
    out.flush().context("flush prompt")?;

    let _guard = PromptRawGuard::enable()?;
    let mut buf = String::new();
    loop {
        let Event::Key(key) = event::read().context("read key event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') = key.code {
                write!(out, "\r\n").ok();
                out.flush().ok();
                disable_raw_mode().ok();
                std::process::exit(130);
            }
            continue;
        }
        match key.code {
            KeyCode::Enter => {
                write!(out, "\r\n").context("finish prompt line")?;
                out.flush().context("flush prompt")?;
                return Ok(Some(buf));
            }
            KeyCode::Esc => {
                write!(out, "\r\n").context("finish prompt line")?;
                out.flush().context("flush prompt")?;
                return Ok(None);
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    write!(out, "\u{8} \u{8}").context("erase char")?;
                    out.flush().context("flush prompt")?;
                }
            }
            KeyCode::Char(c) => {
                buf.push(c);
                write!(out, "{}", c).context("echo char")?;
                out.flush().context("flush prompt")?;
            }
            _ => {}
        }
    }
}

/// Yes/no prompt; Enter accepts the default, Escape cancels.
pub fn prompt_yes_no(label: &str, default_yes: bool) -> Result<Option<bool>> {
    let suffix = if default_yes { "[Y/n]" } else { "[y/N]" };
    loop {
        let Some(answer) = prompt_line(&format!("{} {}", label, suffix))? else {
            return Ok(None);
        };
        match answer.trim().to_lowercase().as_str() {
            "" => return Ok(Some(default_yes)),
            "y" | "yes" => return Ok(Some(true)),
            "n" | "no" => return Ok(Some(false)),
            other => println!("please answer y or n (got '{}')", other),
        }
    }
}

fn read_plain_line(label: &str) -> Result<Option<String>> {
    let mut out = io::stdout();
    write!(out, "{}: ", label).context("write prompt")?;
    out.flush().context("flush prompt")?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read prompt line")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

struct PromptRawGuard;

impl PromptRawGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for PromptRawGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}
