use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use formbind::{Control, Dispatch};
use tracing::debug;

use crate::{
    error::TuiError,
    input::event_for,
    renderer::{RenderFrame, Renderer},
    terminal::Terminal,
    theme::Theme,
};

/// Draws a form of controls in the terminal and routes key presses to them.
///
/// The app owns no form state besides which control has focus. Each frame the
/// caller builds its controls against the current record and hands them in;
/// edits come back through the controls' own callbacks.
#[derive(Debug)]
pub struct FormApp {
    terminal: Terminal,
    renderer: Renderer,
    focus: usize,
}

impl FormApp {
    /// Renders `controls` and flushes the frame to the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error when a control fails to render or when the terminal
    /// cannot be written to.
    pub fn draw(&mut self, controls: &[&mut dyn Control]) -> Result<(), TuiError> {
        let frame = self.render_to_frame(controls)?;
        self.terminal.render(&frame)
    }

    /// Renders `controls` to a frame without drawing it.
    ///
    /// # Errors
    ///
    /// Propagates the first control's binding error.
    pub fn render_to_frame(&mut self, controls: &[&mut dyn Control]) -> Result<RenderFrame, TuiError> {
        self.clamp_focus(controls.len());
        let focus = (!controls.is_empty()).then_some(self.focus);
        self.renderer.render_controls(controls, focus)
    }

    /// Handles one key press.
    ///
    /// `Up`/`Down` and `Tab`/`BackTab` move the focus, wrapping around. Other
    /// keys go to the focused control; `Ok(Some(_))` reports what the control
    /// did with the resulting event, `Ok(None)` means no event was produced.
    ///
    /// # Errors
    ///
    /// Returns the focused control's binding error.
    pub fn handle_key(
        &mut self,
        controls: &mut [&mut dyn Control],
        key: KeyEvent,
    ) -> Result<Option<Dispatch>, TuiError> {
        if key.kind == KeyEventKind::Release || controls.is_empty() {
            return Ok(None);
        }
        self.clamp_focus(controls.len());
        match key.code {
            KeyCode::Down | KeyCode::Tab => {
                self.focus = (self.focus + 1) % controls.len();
                Ok(None)
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.focus = (self.focus + controls.len() - 1) % controls.len();
                Ok(None)
            }
            _ => {
                let control = &mut controls[self.focus];
                let view = control.view()?;
                let Some(event) = event_for(&view, key) else {
                    return Ok(None);
                };
                debug!(key = control.key_name(), ?event, "dispatching key press");
                Ok(Some(control.dispatch(event)?))
            }
        }
    }

    /// Blocks until the next key press on the attached terminal.
    ///
    /// # Errors
    ///
    /// See [`Terminal::next_key`].
    pub fn next_key(&mut self) -> Result<KeyEvent, TuiError> {
        self.terminal.next_key()
    }

    /// Index of the focused control.
    #[must_use]
    pub const fn focus(&self) -> usize {
        self.focus
    }

    /// Provides immutable access to the terminal handle.
    #[must_use]
    pub const fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    /// Provides immutable access to the renderer.
    #[must_use]
    pub const fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    const fn clamp_focus(&mut self, len: usize) {
        if self.focus >= len {
            self.focus = len.saturating_sub(1);
        }
    }
}

/// Builder for [`FormApp`] instances.
#[derive(Debug, Default)]
pub struct FormAppBuilder {
    terminal: Option<Terminal>,
    theme: Theme,
    focus: usize,
}

impl FormAppBuilder {
    /// Creates a builder with the default theme, drawing to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the terminal handle used by the application.
    #[must_use]
    pub fn with_terminal(mut self, terminal: Terminal) -> Self {
        self.terminal = Some(terminal);
        self
    }

    /// Replaces the theme used for rendering.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Sets the initially focused control.
    #[must_use]
    pub const fn with_focus(mut self, focus: usize) -> Self {
        self.focus = focus;
        self
    }

    /// Consumes the builder and produces a [`FormApp`].
    ///
    /// # Errors
    ///
    /// Returns an error if no terminal was given and stdout cannot be taken over.
    pub fn build(self) -> Result<FormApp, TuiError> {
        let terminal = match self.terminal {
            Some(terminal) => terminal,
            None => Terminal::stdout()?,
        };
        Ok(FormApp {
            terminal,
            renderer: Renderer::new(self.theme),
            focus: self.focus,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use formbind::{CheckboxControl, SliderControl};
    use serde_json::json;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> FormApp {
        FormAppBuilder::new()
            .with_terminal(Terminal::buffered())
            .with_theme(Theme::plain().with_track_width(3))
            .build()
            .expect("building app should succeed")
    }

    #[test]
    fn draw_into_buffer() {
        let controls = json!({ "muted": false, "gain": 0 });
        let mut app = app();
        let mut checkbox = CheckboxControl::new(&controls, "muted", |_: &String, _| {});
        let mut slider = SliderControl::new(&controls, "gain", 0.0, 1.0, |_: &String, _| {});
        app.draw(&[&mut checkbox, &mut slider]).expect("drawing should succeed");
        let snapshot = app.terminal().snapshot().expect("buffered terminal");
        assert_eq!(snapshot, "› muted [ ]\n  gain: 0\n  0 [●--] 1");
    }

    #[test]
    fn keys_move_focus_and_dispatch() {
        let controls = json!({ "muted": false, "gain": 0 });
        let mut toggles = Vec::new();
        let mut slides = Vec::new();
        let mut app = app();
        {
            let mut checkbox =
                CheckboxControl::new(&controls, "muted", |_: &String, value| toggles.push(value));
            let mut slider = SliderControl::new(&controls, "gain", 0.0, 1.0, |_: &String, value| {
                slides.push(value);
            })
            .step(0.5);
            let mut form: [&mut dyn Control; 2] = [&mut checkbox, &mut slider];

            assert_eq!(app.handle_key(&mut form, press(KeyCode::Char(' '))).unwrap(), Some(Dispatch::Sent));
            assert_eq!(app.handle_key(&mut form, press(KeyCode::Down)).unwrap(), None);
            assert_eq!(app.focus(), 1);
            assert_eq!(app.handle_key(&mut form, press(KeyCode::Right)).unwrap(), Some(Dispatch::Sent));
            assert_eq!(app.handle_key(&mut form, press(KeyCode::Char('x'))).unwrap(), None);
            app.handle_key(&mut form, press(KeyCode::Down)).unwrap();
            assert_eq!(app.focus(), 0);
            app.handle_key(&mut form, press(KeyCode::Up)).unwrap();
            assert_eq!(app.focus(), 1);
        }
        assert_eq!(toggles, [true]);
        assert_eq!(slides, [0.5]);
    }

    #[test]
    fn buffered_terminal_has_no_input() {
        let mut app = app();
        assert!(matches!(app.next_key(), Err(TuiError::TerminalUnavailable)));
    }

    #[test]
    fn focus_is_clamped_to_form() {
        let controls = json!({ "muted": true });
        let mut app = FormAppBuilder::new()
            .with_terminal(Terminal::buffered())
            .with_theme(Theme::plain())
            .with_focus(7)
            .build()
            .unwrap();
        let mut checkbox = CheckboxControl::new(&controls, "muted", |_: &String, _| {});
        let frame = app.render_to_frame(&[&mut checkbox]).unwrap();
        assert_eq!(frame.plain_text(), "› muted [x]");
        assert_eq!(app.focus(), 0);
    }
}
