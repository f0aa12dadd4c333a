#![allow(clippy::multiple_crate_versions)]

//! Terminal backend for `formbind` controls.
//!
//! [`FormApp`] draws a list of controls, one per line, and turns key presses
//! into the change events the controls understand. The form state stays with
//! the caller: controls are rebuilt against the current record for every frame
//! and report edits through their update callbacks.

pub use crate::app::{FormApp, FormAppBuilder};
pub use crate::input::event_for;
pub use crate::renderer::{RenderFrame, RenderLine, RenderSegment, Renderer};
pub use crate::terminal::Terminal;
pub use crate::theme::Theme;
pub use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

mod app;
mod error;
pub mod input;
mod renderer;
mod terminal;
mod theme;

pub use error::TuiError;
