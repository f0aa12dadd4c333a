//! A continuous-range slider bound to a numeric field.

use core::fmt;

use tracing::{trace, warn};

use crate::{
    control::{Control, label_for},
    controls::{Binding, ControlKey, Controls, Field},
    error::{BindError, Result},
    value::NumberValue,
    view::{ChangeEvent, ControlView, Dispatch, SliderView},
};

/// A labeled slider whose value is a numeric field of a caller-owned record.
///
/// The caption shows the live value, e.g. `cutoff: 440`. Every value the
/// widget emits is reported as-is, one callback per event; the slider does
/// not debounce.
///
/// # Examples
///
/// ```
/// use formbind::SliderControl;
/// use serde_json::json;
///
/// let controls = json!({ "cutoff": 440 });
/// let slider = SliderControl::new(&controls, "cutoff", 20.0, 20_000.0, |_: &String, _| {})
///     .step(10.0);
/// let view = slider.render().unwrap();
/// assert_eq!(view.caption, "cutoff: 440");
/// assert_eq!(view.step, Some(10.0));
/// ```
pub struct SliderControl<'a, C: Controls, F> {
    controls: &'a C,
    binding: Binding<'a, C, f64>,
    min: f64,
    max: f64,
    step: Option<f64>,
    text: Option<String>,
    update: F,
}

impl<'a, C, F> SliderControl<'a, C, F>
where
    C: Controls,
    F: FnMut(&C::Key, f64),
{
    /// Binds a slider over `min..=max` to the field named by `key`.
    pub fn new(controls: &'a C, key: impl Into<C::Key>, min: f64, max: f64, update: F) -> Self {
        Self::with_binding(controls, Binding::Key(key.into()), min, max, update)
    }

    /// Binds a slider through a typed numeric field of any primitive number type.
    pub fn bound<W>(controls: &'a C, field: Field<C, W>, min: f64, max: f64, update: F) -> Self
    where
        C: 'a,
        W: NumberValue + 'a,
    {
        let binding = Binding::typed(field, |value: W| value.to_number());
        Self::with_binding(controls, binding, min, max, update)
    }

    fn with_binding(
        controls: &'a C,
        binding: Binding<'a, C, f64>,
        min: f64,
        max: f64,
        update: F,
    ) -> Self {
        Self {
            controls,
            binding,
            min,
            max,
            step: None,
            text: None,
            update,
        }
    }

    /// Quantizes the range by `step`.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
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

    fn check_range(&self) -> Result<()> {
        let step_ok = self.step.is_none_or(|step| step.is_finite() && step > 0.0);
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max && step_ok {
            Ok(())
        } else {
            Err(BindError::InvalidRange {
                key: self.binding.name().to_owned(),
                min: self.min,
                max: self.max,
                step: self.step,
            })
        }
    }

    fn value(&self) -> Result<f64> {
        match &self.binding {
            Binding::Key(key) => self.controls.field(key).as_number(key.name()),
            Binding::Typed { read, .. } => Ok(read(self.controls)),
        }
    }

    /// Renders the slider against the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::TypeMismatch`] when the bound field is not a
    /// number and [`BindError::InvalidRange`] for unusable bounds.
    pub fn render(&self) -> Result<SliderView> {
        let build = || -> Result<SliderView> {
            self.check_range()?;
            let value = self.value()?;
            Ok(SliderView::new(
                label_for(self.text.as_deref(), self.binding.name()),
                self.min,
                self.max,
                self.step,
                value,
            ))
        };
        build().inspect_err(|err| warn!(key = self.binding.name(), %err, "slider render failed"))
    }

    /// Handles one change event from the widget, reporting `value` once.
    ///
    /// # Errors
    ///
    /// Returns the render error of a slider that cannot display its field; the
    /// callback is not invoked.
    pub fn slide(&mut self, value: f64) -> Result<Dispatch> {
        self.check_range()?;
        self.value()?;
        trace!(key = self.binding.name(), value, "slider moved");
        (self.update)(self.binding.key(), value);
        Ok(Dispatch::Sent)
    }
}

impl<C, F> Control for SliderControl<'_, C, F>
where
    C: Controls,
    F: FnMut(&C::Key, f64),
{
    fn key_name(&self) -> &str {
        self.binding.name()
    }

    fn view(&self) -> Result<ControlView> {
        self.render().map(ControlView::from)
    }

    fn dispatch(&mut self, event: ChangeEvent) -> Result<Dispatch> {
        match event {
            ChangeEvent::Slide(value) => self.slide(value),
            _ => Err(BindError::EventMismatch {
                key: self.binding.name().to_owned(),
                control: "slider",
            }),
        }
    }
}

impl<C: Controls, F> fmt::Debug for SliderControl<'_, C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderControl")
            .field("binding", &self.binding)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
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
    fn renders_exact_value_in_caption() {
        for value in [0.0, 2.5, 7.0, 10.0] {
            let controls = json!({ "gain": value });
            let view = SliderControl::new(&controls, "gain", 0.0, 10.0, |_: &String, _| {})
                .render()
                .unwrap();
            assert_eq!(view.value, value);
            assert!(view.caption.ends_with(&crate::value::format_number(value)));
            assert!(view.caption.starts_with("gain: "));
        }
    }

    #[test]
    fn text_overrides_caption_label() {
        let controls = json!({ "gain": 3 });
        let view = SliderControl::new(&controls, "gain", 0.0, 10.0, |_: &String, _| {})
            .text("Gain")
            .render()
            .unwrap();
        assert_eq!(view.caption, "Gain: 3");
    }

    #[test]
    fn non_numbers_fail() {
        for value in [json!("3"), json!(true), json!(null), json!({})] {
            let controls = json!({ "gain": value });
            let err = SliderControl::new(&controls, "gain", 0.0, 10.0, |_: &String, _| {})
                .render()
                .unwrap_err();
            assert!(matches!(err, BindError::TypeMismatch { expected: ValueKind::Number, .. }));
        }
    }

    #[test]
    fn invalid_ranges_fail() {
        let controls = json!({ "gain": 3 });
        let render = |min, max, step: Option<f64>| {
            let slider = SliderControl::new(&controls, "gain", min, max, |_: &String, _| {});
            match step {
                Some(step) => slider.step(step).render(),
                None => slider.render(),
            }
        };
        assert!(render(10.0, 0.0, None).is_err());
        assert!(render(0.0, f64::INFINITY, None).is_err());
        assert!(render(0.0, 10.0, Some(0.0)).is_err());
        assert!(render(0.0, 10.0, Some(-1.0)).is_err());
        assert!(render(5.0, 5.0, Some(1.0)).is_ok());
    }

    #[test]
    fn slide_reports_once() {
        let controls = json!({ "gain": 3 });
        let mut calls = Vec::new();
        let mut slider = SliderControl::new(&controls, "gain", 0.0, 10.0, |key: &String, value| {
            calls.push((key.clone(), value));
        });
        assert_eq!(slider.slide(7.0).unwrap(), Dispatch::Sent);
        drop(slider);
        assert_eq!(calls, [("gain".to_owned(), 7.0)]);
        assert_eq!(controls, json!({ "gain": 3 }));
    }

    #[test]
    fn every_event_is_forwarded() {
        let controls = json!({ "gain": 3 });
        let mut calls = 0;
        let mut slider = SliderControl::new(&controls, "gain", 0.0, 10.0, |_: &String, _| calls += 1);
        for value in [4.0, 4.0, 5.0] {
            assert_eq!(slider.slide(value).unwrap(), Dispatch::Sent);
        }
        drop(slider);
        assert_eq!(calls, 3);
    }

    #[test]
    fn tiny_values_caption_in_exponent_form() {
        let controls = json!({ "gain": 1e-7 });
        let view = SliderControl::new(&controls, "gain", 0.0, 1.0, |_: &String, _| {})
            .render()
            .unwrap();
        assert_eq!(view.caption, "gain: 1e-7");
    }

    #[test]
    fn rerender_is_identical() {
        let controls = json!({ "gain": 3.5 });
        let slider = SliderControl::new(&controls, "gain", 0.0, 10.0, |_: &String, _| {}).step(0.5);
        assert_eq!(slider.render().unwrap(), slider.render().unwrap());
    }
}
