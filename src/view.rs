//! Rendered descriptors handed to a backend.
//!
//! Rendering a control produces plain data: what label to show, which value is
//! current, which items exist. A backend turns that into pixels or terminal
//! cells and turns user input back into a [`ChangeEvent`]. Two renders of the
//! same snapshot compare equal.

use crate::value::format_number;

/// A selectable item of a [`SelectView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    /// The value reported when this item is selected.
    pub value: String,
    /// The text shown for this item.
    pub label: String,
    /// Whether this is the "no selection" sentinel.
    pub is_none: bool,
}

impl SelectItem {
    /// Label used for the "no selection" sentinel.
    pub const NONE_LABEL: &'static str = "None";

    /// Creates a regular item.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            is_none: false,
        }
    }

    /// Creates the "no selection" sentinel, whose value is the empty string.
    #[must_use]
    pub fn none() -> Self {
        Self {
            value: String::new(),
            label: Self::NONE_LABEL.to_owned(),
            is_none: true,
        }
    }
}

/// A labeled dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SelectView {
    /// Input name and id, taken from the bound key.
    pub id: String,
    /// The caption above the dropdown.
    pub label: String,
    /// The current selection. May match no item.
    pub selected: String,
    /// Items in display order.
    pub items: Vec<SelectItem>,
    /// Whether interaction is suppressed.
    pub disabled: bool,
}

impl SelectView {
    /// Index of the selected item, if the selection matches one.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.value == self.selected)
    }

    /// The selected item, if the selection matches one.
    #[must_use]
    pub fn selected_item(&self) -> Option<&SelectItem> {
        self.position().map(|index| &self.items[index])
    }

    /// The label of the selected item, if the selection matches one.
    #[must_use]
    pub fn selected_label(&self) -> Option<&str> {
        self.selected_item().map(|item| item.label.as_str())
    }

    /// Whether `value` is one of the items.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|item| item.value == value)
    }
}

/// A labeled checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CheckboxView {
    /// Input name, taken from the bound key.
    pub name: String,
    /// Text next to the box.
    pub label: String,
    /// Whether the box is checked.
    pub checked: bool,
}

/// A labeled toggle switch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SwitchView {
    /// Text next to the switch.
    pub label: String,
    /// Whether the switch is on.
    pub checked: bool,
    /// Whether interaction is suppressed.
    pub disabled: bool,
}

/// A labeled continuous-range input.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct SliderView {
    /// The field label without the value.
    pub label: String,
    /// The caption shown above the track, `"{label}: {value}"`.
    pub caption: String,
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Quantization step, if any.
    pub step: Option<f64>,
    /// Current value.
    pub value: f64,
}

impl SliderView {
    pub(crate) fn new(label: String, min: f64, max: f64, step: Option<f64>, value: f64) -> Self {
        let caption = format!("{label}: {}", format_number(value));
        Self {
            label,
            caption,
            min,
            max,
            step,
            value,
        }
    }

    /// Clamps `value` into the range and snaps it to the step grid anchored at `min`.
    #[must_use]
    pub fn quantize(&self, value: f64) -> f64 {
        let value = value.clamp(self.min, self.max);
        match self.step {
            Some(step) if step > 0.0 => {
                let snapped = ((value - self.min) / step).round().mul_add(step, self.min);
                snapped.min(self.max)
            }
            _ => value,
        }
    }

    /// Position of the current value within the range, in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Any rendered control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlView {
    /// A dropdown.
    Select(SelectView),
    /// A checkbox.
    Checkbox(CheckboxView),
    /// A toggle switch.
    Switch(SwitchView),
    /// A slider.
    Slider(SliderView),
}

impl ControlView {
    /// The label shown for the control.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Select(view) => &view.label,
            Self::Checkbox(view) => &view.label,
            Self::Switch(view) => &view.label,
            Self::Slider(view) => &view.label,
        }
    }

    /// Whether interaction with the control is suppressed.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        match self {
            Self::Select(view) => view.disabled,
            Self::Switch(view) => view.disabled,
            Self::Checkbox(_) | Self::Slider(_) => false,
        }
    }
}

impl From<SelectView> for ControlView {
    fn from(view: SelectView) -> Self {
        Self::Select(view)
    }
}

impl From<CheckboxView> for ControlView {
    fn from(view: CheckboxView) -> Self {
        Self::Checkbox(view)
    }
}

impl From<SwitchView> for ControlView {
    fn from(view: SwitchView) -> Self {
        Self::Switch(view)
    }
}

impl From<SliderView> for ControlView {
    fn from(view: SliderView) -> Self {
        Self::Slider(view)
    }
}

/// A user edit emitted by a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// A dropdown item with this value was picked.
    Select(String),
    /// A checkbox or switch was set to this state.
    Toggle(bool),
    /// A slider moved to this value.
    Slide(f64),
}

/// What a control did with a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Dispatch {
    /// The edit callback was invoked once.
    Sent,
    /// The event repeated the current value; no callback.
    Unchanged,
    /// The control is disabled; no callback.
    Disabled,
}
