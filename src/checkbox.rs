//! A checkbox bound to a boolean field.

use core::fmt;

use tracing::{trace, warn};

use crate::{
    control::{Control, label_for},
    controls::{Binding, ControlKey, Controls, Field},
    error::{BindError, Result},
    view::{ChangeEvent, CheckboxView, ControlView, Dispatch},
};

/// A labeled checkbox whose checked state is a boolean field of a caller-owned
/// record.
///
/// Rendering fails with [`BindError::TypeMismatch`] when the field is not a
/// boolean; there is no fallback state.
pub struct CheckboxControl<'a, C: Controls, F> {
    controls: &'a C,
    binding: Binding<'a, C, bool>,
    text: Option<String>,
    update: F,
}

/// Reads a boolean binding, checking the field type for keyed bindings.
pub(crate) fn read_bool<C: Controls>(controls: &C, binding: &Binding<'_, C, bool>) -> Result<bool> {
    match binding {
        Binding::Key(key) => controls.field(key).as_bool(key.name()),
        Binding::Typed { read, .. } => Ok(read(controls)),
    }
}

impl<'a, C, F> CheckboxControl<'a, C, F>
where
    C: Controls,
    F: FnMut(&C::Key, bool),
{
    /// Binds a checkbox to the field named by `key`.
    pub fn new(controls: &'a C, key: impl Into<C::Key>, update: F) -> Self {
        Self {
            controls,
            binding: Binding::Key(key.into()),
            text: None,
            update,
        }
    }

    /// Binds a checkbox through a typed boolean field.
    pub fn bound(controls: &'a C, field: Field<C, bool>, update: F) -> Self
    where
        C: 'a,
    {
        Self {
            controls,
            binding: Binding::typed(field, core::convert::identity),
            text: None,
            update,
        }
    }

    /// Overrides the label. Defaults to the key name.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// The bound key.
    pub const fn key(&self) -> &C::Key {
        self.binding.key()
    }

    /// Renders the checkbox against the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::TypeMismatch`] when the bound field is not a boolean.
    pub fn render(&self) -> Result<CheckboxView> {
        let checked = read_bool(self.controls, &self.binding)
            .inspect_err(|err| warn!(key = self.binding.name(), %err, "checkbox render failed"))?;
        Ok(CheckboxView {
            name: self.binding.name().to_owned(),
            label: label_for(self.text.as_deref(), self.binding.name()),
            checked,
        })
    }

    /// Handles the user toggling the box to `checked`, reporting it once.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::TypeMismatch`] when the bound field is not a
    /// boolean; the callback is not invoked.
    pub fn toggle(&mut self, checked: bool) -> Result<Dispatch> {
        read_bool(self.controls, &self.binding)?;
        trace!(key = self.binding.name(), checked, "checkbox toggled");
        (self.update)(self.binding.key(), checked);
        Ok(Dispatch::Sent)
    }
}

impl<C, F> Control for CheckboxControl<'_, C, F>
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
                control: "checkbox",
            }),
        }
    }
}

impl<C: Controls, F> fmt::Debug for CheckboxControl<'_, C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckboxControl")
            .field("binding", &self.binding)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;
    use serde_json::json;

    #[test]
    fn checked_follows_field() {
        for value in [true, false] {
            let controls = json!({ "muted": value });
            let view = CheckboxControl::new(&controls, "muted", |_: &String, _| {})
                .render()
                .unwrap();
            assert_eq!(view.checked, value);
            assert_eq!(view.name, "muted");
            assert_eq!(view.label, "muted");
        }
    }

    #[test]
    fn non_booleans_fail() {
        for value in [json!(1), json!("true"), json!(null), json!({}), json!([])] {
            let controls = json!({ "muted": value });
            let err = CheckboxControl::new(&controls, "muted", |_: &String, _| {})
                .render()
                .unwrap_err();
            assert!(
                matches!(err, BindError::TypeMismatch { ref key, expected: ValueKind::Boolean, .. } if key == "muted")
            );
        }
        let missing = json!({});
        assert!(CheckboxControl::new(&missing, "muted", |_: &String, _| {}).render().is_err());
    }

    #[test]
    fn toggle_reports_once() {
        let controls = json!({ "muted": false });
        let mut calls = Vec::new();
        let mut checkbox = CheckboxControl::new(&controls, "muted", |key: &String, value| {
            calls.push((key.clone(), value));
        })
        .text("Mute");
        assert_eq!(checkbox.render().unwrap().label, "Mute");
        assert_eq!(checkbox.toggle(true).unwrap(), Dispatch::Sent);
        drop(checkbox);
        assert_eq!(calls, [("muted".to_owned(), true)]);
        assert_eq!(controls, json!({ "muted": false }));
    }

    #[test]
    fn toggle_on_mismatched_field_fires_nothing() {
        let controls = json!({ "muted": "no" });
        let mut calls = 0;
        let mut checkbox = CheckboxControl::new(&controls, "muted", |_: &String, _| calls += 1);
        assert!(checkbox.toggle(true).is_err());
        drop(checkbox);
        assert_eq!(calls, 0);
    }

    #[test]
    fn rerender_is_identical() {
        let controls = json!({ "muted": true });
        let checkbox = CheckboxControl::new(&controls, "muted", |_: &String, _| {});
        assert_eq!(checkbox.render().unwrap(), checkbox.render().unwrap());
    }
}
