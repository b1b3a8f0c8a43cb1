/// Rendering layer: all terminal output lives here.
///
/// Receives finished `Frame`s from the scheduler and writes them with
/// crossterm.  No game logic is performed; the only decision made here is
/// which colour each glyph gets.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};

use console_pong::frame::Frame;
use console_pong::scheduler::Display;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_TEXT: Color = Color::White;
const C_PADDLE: Color = Color::White;
const C_BALL: Color = Color::Yellow;
const C_TRAIL: Color = Color::DarkYellow;
const C_POWERUP: Color = Color::Cyan;
const C_SPARK: Color = Color::Magenta;
const C_NET: Color = Color::DarkGrey;

fn glyph_color(c: char) -> Color {
    match c {
        '║' | '═' | '╔' | '╗' | '╚' | '╝' => C_BORDER,
        '█' | '▐' | '▌' => C_PADDLE,
        '●' => C_BALL,
        '·' | '∙' | '◦' | '○' => C_TRAIL,
        '⊕' | '⊗' | '⊘' | '⊖' | '◆' | '◈' => C_POWERUP,
        '★' | '✦' | '*' | '+' | '!' | '~' | ':' | '.' | '─' => C_SPARK,
        '│' => C_NET,
        _ => C_TEXT,
    }
}

// ── Terminal display ──────────────────────────────────────────────────────────

/// Writes frames to a terminal, redrawing in place from the home position.
pub struct TerminalDisplay<W: Write> {
    out: W,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        TerminalDisplay { out }
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn render(&mut self, frame: &Frame) -> io::Result<()> {
        let mut current = C_TEXT;
        self.out.queue(style::SetForegroundColor(current))?;

        for (row, line) in frame.lines.iter().enumerate() {
            self.out.queue(cursor::MoveTo(0, row as u16))?;
            for c in line.chars() {
                let color = glyph_color(c);
                if color != current {
                    self.out.queue(style::SetForegroundColor(color))?;
                    current = color;
                }
                self.out.queue(Print(c))?;
            }
            self.out
                .queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
        }

        // Wipe whatever a taller previous screen left below us
        self.out
            .queue(cursor::MoveTo(0, frame.lines.len() as u16))?;
        self.out
            .queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.out.execute(terminal::Clear(terminal::ClearType::All))?;
        self.out.execute(cursor::MoveTo(0, 0))?;
        Ok(())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.out.execute(cursor::Hide)?;
        Ok(())
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.out.execute(cursor::Show)?;
        Ok(())
    }
}

// ── Scoped terminal setup ─────────────────────────────────────────────────────

/// Raw mode + alternate screen for as long as this value lives.
///
/// Restoration happens in `Drop`, so it runs on a normal quit, on an error
/// bubbling out of the game loop and while unwinding from a panic.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = TerminalGuard;
        let mut out = io::stdout();
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = out.execute(style::ResetColor);
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
