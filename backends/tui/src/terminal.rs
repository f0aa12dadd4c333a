use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyEvent},
    execute, queue,
    style::PrintStyledContent,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::{error::TuiError, renderer::RenderFrame};

/// Where frames end up.
#[derive(Debug)]
enum Target {
    /// The process terminal, in raw mode on the alternate screen.
    Stdout(Stdout),
    /// The plain text of the last frame.
    Buffer(String),
}

/// Output target for rendered forms.
///
/// A stdout terminal enters raw mode and the alternate screen on creation and
/// restores both when dropped. A buffered terminal keeps the plain text of the
/// last frame, which is what tests inspect.
#[derive(Debug)]
pub struct Terminal {
    target: Target,
}

impl Terminal {
    /// Takes over the process terminal.
    ///
    /// # Errors
    ///
    /// Returns an error when raw mode or the alternate screen cannot be entered.
    pub fn stdout() -> Result<Self, TuiError> {
        let mut handle = io::stdout();
        terminal::enable_raw_mode()?;
        if let Err(err) = execute!(handle, EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err.into());
        }
        Ok(Self {
            target: Target::Stdout(handle),
        })
    }

    /// Creates an in-memory terminal.
    #[must_use]
    pub const fn buffered() -> Self {
        Self {
            target: Target::Buffer(String::new()),
        }
    }

    /// Draws `frame`, replacing whatever was shown before.
    ///
    /// # Errors
    ///
    /// Returns an error when writing to the terminal fails.
    pub fn render(&mut self, frame: &RenderFrame) -> Result<(), TuiError> {
        match &mut self.target {
            Target::Stdout(handle) => {
                queue!(handle, MoveTo(0, 0), Clear(ClearType::All))?;
                for (row, line) in frame.lines().iter().enumerate() {
                    let row = u16::try_from(row).unwrap_or(u16::MAX);
                    queue!(handle, MoveTo(0, row))?;
                    for segment in line.segments() {
                        queue!(handle, PrintStyledContent(segment.as_styled_content()))?;
                    }
                }
                handle.flush()?;
            }
            Target::Buffer(buffer) => *buffer = frame.plain_text(),
        }
        Ok(())
    }

    /// Blocks until the next key press.
    ///
    /// # Errors
    ///
    /// Returns [`TuiError::TerminalUnavailable`] for a buffered terminal and an
    /// I/O error when reading input fails.
    pub fn next_key(&mut self) -> Result<KeyEvent, TuiError> {
        if matches!(self.target, Target::Buffer(_)) {
            return Err(TuiError::TerminalUnavailable);
        }
        loop {
            if let Event::Key(key) = event::read()? {
                return Ok(key);
            }
        }
    }

    /// Returns the text of the last frame when created via [`Self::buffered`].
    #[must_use]
    pub fn snapshot(&self) -> Option<&str> {
        match &self.target {
            Target::Buffer(buffer) => Some(buffer),
            Target::Stdout(_) => None,
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Target::Stdout(handle) = &mut self.target {
            let _ = execute!(handle, Show, LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
}
