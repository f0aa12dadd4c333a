//! A toggle switch bound to a boolean field.

use core::fmt;

use tracing::{debug, trace, warn};

use crate::{
    checkbox::read_bool,
    control::{Control, label_for},
    controls::{Binding, Controls, Field},
    error::{BindError, Result},
    view::{ChangeEvent, ControlView, Dispatch, SwitchView},
};

/// A labeled switch whose state is a boolean field of a caller-owned record.
///
/// Same contract as [`CheckboxControl`](crate::CheckboxControl), plus a
/// disabled state in which toggles are ignored.
pub struct SwitchControl<'a, C: Controls, F> {
    controls: &'a C,
    binding: Binding<'a, C, bool>,
    text: Option<String>,
    disabled: bool,
    update: F,
}

impl<'a, C, F> SwitchControl<'a, C, F>
where
    C: Controls,
    F: FnMut(&C::Key, bool),
{
    /// Binds a switch to the field named by `key`.
    pub fn new(controls: &'a C, key: impl Into<C::Key>, update: F) -> Self {
        Self {
            controls,
            binding: Binding::Key(key.into()),
            text: None,
            disabled: false,
            update,
        }
    }

    /// Binds a switch through a typed boolean field.
    pub fn bound(controls: &'a C, field: Field<C, bool>, update: F) -> Self
    where
        C: 'a,
    {
        Self {
            controls,
            binding: Binding::typed(field, core::convert::identity),
            text: None,
            disabled: false,
            update,
        }
    }

    /// Overrides the label. Defaults to the key name.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Suppresses interaction.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// The bound key.
    pub const fn key(&self) -> &C::Key {
        self.binding.key()
    }

    /// Renders the switch against the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::TypeMismatch`] when the bound field is not a boolean.
    pub fn render(&self) -> Result<SwitchView> {
        let checked = read_bool(self.controls, &self.binding)
            .inspect_err(|err| warn!(key = self.binding.name(), %err, "switch render failed"))?;
        Ok(SwitchView {
            label: label_for(self.text.as_deref(), self.binding.name()),
            checked,
            disabled: self.disabled,
        })
    }

    /// Handles the user flipping the switch to `checked`.
    ///
    /// Reports it once unless the switch is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::TypeMismatch`] when the bound field is not a
    /// boolean; the callback is not invoked.
    pub fn toggle(&mut self, checked: bool) -> Result<Dispatch> {
        if self.disabled {
            debug!(key = self.binding.name(), checked, "ignored toggle on disabled switch");
            return Ok(Dispatch::Disabled);
        }
        read_bool(self.controls, &self.binding)?;
        trace!(key = self.binding.name(), checked, "switch toggled");
        (self.update)(self.binding.key(), checked);
        Ok(Dispatch::Sent)
    }
}

impl<C, F> Control for SwitchControl<'_, C, F>
where
    C: Controls,
    F: FnMut(&C::Key, bool),
{
    fn key_name(&self) -> &str {
        self.binding.name()
    }

    fn view(&self) -> Result<ControlView> {
        self.render().map(ControlView::from)
    }

    fn dispatch(&mut self, event: ChangeEvent) -> Result<Dispatch> {
        match event {
            ChangeEvent::Toggle(checked) => self.toggle(checked),
            _ => Err(BindError::EventMismatch {
                key: self.binding.name().to_owned(),
                control: "switch",
            }),
        }
    }
}

impl<C: Controls, F> fmt::Debug for SwitchControl<'_, C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchControl")
            .field("binding", &self.binding)
            .field("text", &self.text)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::value::{FieldValue, ValueKind};

    fn controls(value: FieldValue<'static>) -> HashMap<String, FieldValue<'static>> {
        HashMap::from([("legato".to_owned(), value)])
    }

    #[test]
    fn checked_follows_field() {
        for value in [true, false] {
            let controls = controls(FieldValue::Bool(value));
            let view = SwitchControl::new(&controls, "legato", |_: &String, _| {})
                .render()
                .unwrap();
            assert_eq!(view.checked, value);
            assert!(!view.disabled);
        }
    }

    #[test]
    fn non_booleans_fail() {
        let controls = controls(FieldValue::Number(1.0));
        let err = SwitchControl::new(&controls, "legato", |_: &String, _| {})
            .render()
            .unwrap_err();
        assert_eq!(
            err,
            BindError::TypeMismatch {
                key: "legato".into(),
                expected: ValueKind::Boolean,
                found: ValueKind::Number,
            }
        );
    }

    #[test]
    fn toggle_reports_once() {
        let controls = controls(FieldValue::Bool(true));
        let mut calls = Vec::new();
        let mut switch = SwitchControl::new(&controls, "legato", |key: &String, value| {
            calls.push((key.clone(), value));
        });
        assert_eq!(switch.toggle(false).unwrap(), Dispatch::Sent);
        drop(switch);
        assert_eq!(calls, [("legato".to_owned(), false)]);
    }

    #[test]
    fn disabled_suppresses_toggles() {
        let controls = controls(FieldValue::Bool(true));
        let mut calls = 0;
        let mut switch =
            SwitchControl::new(&controls, "legato", |_: &String, _| calls += 1).disabled(true);
        assert!(switch.render().unwrap().disabled);
        assert_eq!(switch.toggle(false).unwrap(), Dispatch::Disabled);
        let control: &mut dyn Control = &mut switch;
        assert_eq!(control.dispatch(ChangeEvent::Toggle(false)).unwrap(), Dispatch::Disabled);
        drop(switch);
        assert_eq!(calls, 0);
    }
}
