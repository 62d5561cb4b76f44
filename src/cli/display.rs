//! Terminal display for a practice session
//!
//! Typed characters are green when right and red when wrong, the cursor
//! position is highlighted and the rest of the text is dimmed.

use crate::session::PracticeSession;
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{stdout, Result as IoResult, Write};

/// Terminal display manager
pub struct Display;

impl Display {
    pub fn new() -> Self {
        Display
    }

    pub fn clear(&self) -> IoResult<()> {
        let mut stdout = stdout();
        execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )
    }

    /// Redraws the practice text, the status line and the help line.
    pub fn render(&self, session: &PracticeSession) -> IoResult<()> {
        let mut stdout = stdout();
        queue!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Cyan),
            Print("Practice Text"),
            ResetColor,
            cursor::MoveTo(0, 2)
        )?;

        let typed = session.typed();
        for (i, &target) in session.target().iter().enumerate() {
            match typed.get(i) {
                Some(t) if t.correct => {
                    queue!(stdout, SetForegroundColor(Color::Green), Print(target))?;
                }
                Some(_) => {
                    let shown = if target == ' ' { '_' } else { target };
                    queue!(stdout, SetForegroundColor(Color::Red), Print(shown))?;
                }
                None if i == typed.len() => {
                    queue!(
                        stdout,
                        SetForegroundColor(Color::Black),
                        SetBackgroundColor(Color::White),
                        Print(target)
                    )?;
                }
                None => {
                    queue!(stdout, SetForegroundColor(Color::DarkGrey), Print(target))?;
                }
            }
            queue!(stdout, ResetColor)?;
        }

        let (_, rows) = terminal::size().unwrap_or((80, 24));
        let accuracy = session.accuracy();
        queue!(
            stdout,
            cursor::MoveTo(0, rows.saturating_sub(2)),
            Print(format!(
                "{}/{} chars  |  Accuracy: ",
                session.cursor(),
                session.target().len()
            )),
            SetForegroundColor(if accuracy > 0.9 {
                Color::Green
            } else if accuracy > 0.8 {
                Color::Yellow
            } else {
                Color::Red
            }),
            Print(format!("{:.0}%", accuracy * 100.0)),
            ResetColor,
            cursor::MoveTo(0, rows.saturating_sub(1)),
            SetForegroundColor(Color::DarkGrey),
            Print("Backspace to correct  |  Esc or Ctrl+C to stop and save"),
            ResetColor
        )?;
        stdout.flush()
    }

    pub fn shutdown(&self) -> IoResult<()> {
        let mut stdout = stdout();
        execute!(stdout, cursor::Show)?;
        terminal::disable_raw_mode()
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = self.shutdown();
    }
}
