use std::io;

use formbind::BindError;
use thiserror::Error;

/// Errors that can occur while drawing a form or feeding it input.
#[derive(Debug, Error)]
pub enum TuiError {
    /// Returned when an operation needs a real terminal but the app writes to a buffer.
    #[error("no interactive terminal is attached")]
    TerminalUnavailable,
    /// Low level terminal I/O failure.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
    /// A control could not render or rejected an event.
    #[error(transparent)]
    Bind(#[from] BindError),
}
