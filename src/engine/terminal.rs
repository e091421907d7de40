use crate::error::{Error, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Raw mode and the alternate screen for as long as the guard lives.
pub struct TerminalGuard
{
    stdout: Stdout,
}

impl TerminalGuard
{
    pub fn enter() -> Result<Self>
    {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode().map_err(Error::Terminal)?;
        execute!(stdout, EnterAlternateScreen, Hide).map_err(Error::Terminal)?;
        Ok(Self { stdout })
    }

    pub fn draw(&mut self, lines: &[String]) -> Result<()>
    {
        let output = format!("{}\r\n", lines.join("\r\n"));
        queue!(self.stdout, MoveTo(0, 0), Clear(ClearType::All)).map_err(Error::Terminal)?;
        self.stdout
            .write_all(output.as_bytes())
            .map_err(Error::Terminal)?;
        self.stdout.flush().map_err(Error::Terminal)
    }
}

impl Drop for TerminalGuard
{
    fn drop(&mut self)
    {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub fn poll_key(timeout: Duration) -> Result<Option<KeyEvent>>
{
    if !event::poll(timeout).map_err(Error::Terminal)? {
        return Ok(None);
    }
    match event::read().map_err(Error::Terminal)? {
        Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Drops pending input, then blocks until one of `codes` is pressed.
pub fn wait_for_key(codes: &[KeyCode]) -> Result<KeyCode>
{
    while poll_key(Duration::from_millis(0))?.is_some() {}

    loop {
        if let Some(key) = poll_key(Duration::from_millis(50))? {
            if codes.contains(&key.code) {
                return Ok(key.code);
            }
        }
    }
}
