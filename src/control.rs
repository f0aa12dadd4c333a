//! Object-safe access to any bound control.

use crate::{
    error::Result,
    view::{ChangeEvent, ControlView, Dispatch},
};

/// A bound control a container can render and feed events to without knowing
/// its concrete type.
///
/// Implemented by all four controls, so a backend can drive a
/// `&mut [&mut dyn Control]` form.
pub trait Control {
    /// Name of the bound field.
    fn key_name(&self) -> &str;

    /// Renders the control against the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns the control's binding error when the bound field cannot be
    /// displayed.
    fn view(&self) -> Result<ControlView>;

    /// Routes a widget event to the control.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::EventMismatch`](crate::BindError::EventMismatch)
    /// when the event does not belong to this kind of control, or the control's
    /// own binding error.
    fn dispatch(&mut self, event: ChangeEvent) -> Result<Dispatch>;
}

/// The caption for a control: the explicit text unless empty, else the key.
pub(crate) fn label_for(text: Option<&str>, key: &str) -> String {
    text.filter(|text| !text.is_empty())
        .unwrap_or(key)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::label_for;

    #[test]
    fn label_falls_back_to_key() {
        assert_eq!(label_for(None, "muted"), "muted");
        assert_eq!(label_for(Some(""), "muted"), "muted");
        assert_eq!(label_for(Some("Mute"), "muted"), "Mute");
    }
}
