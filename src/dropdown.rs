//! A dropdown bound to a textual (or numeric) field.

use core::fmt;
use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::{
    control::{Control, label_for},
    controls::{Binding, ControlKey, Controls, Field},
    error::{BindError, Result},
    value::SelectValue,
    view::{ChangeEvent, ControlView, Dispatch, SelectItem, SelectView},
};

/// A labeled dropdown whose selection is a field of a caller-owned record.
///
/// The bound value is coerced to a string: text is used verbatim, numbers are
/// written in decimal and falsy values (absent, null, `false`, `0`, `""`)
/// select the empty string, which is also the value of the optional "none"
/// item. Any other value fails the render with
/// [`BindError::TypeConversion`].
///
/// # Examples
///
/// ```
/// use formbind::{DropDownControl, Dispatch};
/// use serde_json::json;
///
/// let controls = json!({ "wave": "saw" });
/// let mut edits = Vec::new();
/// let mut dropdown = DropDownControl::new(
///     &controls,
///     "wave",
///     [("sine", "Sine"), ("saw", "Saw")],
///     |key: &String, value| edits.push((key.clone(), value)),
/// );
/// assert_eq!(dropdown.render().unwrap().selected_label(), Some("Saw"));
/// assert_eq!(dropdown.select("sine").unwrap(), Dispatch::Sent);
/// drop(dropdown);
/// assert_eq!(edits, [("wave".to_owned(), "sine".to_owned())]);
/// ```
pub struct DropDownControl<'a, C: Controls, F> {
    controls: &'a C,
    binding: Binding<'a, C, String>,
    options: Vec<SelectItem>,
    text: Option<String>,
    disabled: bool,
    none_option: bool,
    update: F,
}

impl<'a, C, F> DropDownControl<'a, C, F>
where
    C: Controls,
    F: FnMut(&C::Key, String),
{
    /// Binds a dropdown to the field named by `key`.
    ///
    /// `options` are `(value, label)` pairs shown in the given order.
    pub fn new<I, V, L>(controls: &'a C, key: impl Into<C::Key>, options: I, update: F) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        Self::with_binding(controls, Binding::Key(key.into()), options, update)
    }

    /// Binds a dropdown through a typed field descriptor.
    pub fn bound<W, I, V, L>(controls: &'a C, field: Field<C, W>, options: I, update: F) -> Self
    where
        C: 'a,
        W: SelectValue + 'a,
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        let binding = Binding::typed(field, |value: W| value.to_selection().into_owned());
        Self::with_binding(controls, binding, options, update)
    }

    fn with_binding<I, V, L>(
        controls: &'a C,
        binding: Binding<'a, C, String>,
        options: I,
        update: F,
    ) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        Self {
            controls,
            binding,
            options: options
                .into_iter()
                .map(|(value, label)| SelectItem::new(value, label))
                .collect(),
            text: None,
            disabled: false,
            none_option: false,
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

    /// Prepends a "none" item whose value is the empty string.
    #[must_use]
    pub fn none_option(mut self, none_option: bool) -> Self {
        self.none_option = none_option;
        self
    }

    /// The bound key.
    pub const fn key(&self) -> &C::Key {
        self.binding.key()
    }

    fn selection(&self) -> Result<String> {
        match &self.binding {
            Binding::Key(key) => Ok(self
                .controls
                .field(key)
                .to_selection(key.name())?
                .into_owned()),
            Binding::Typed { read, .. } => Ok(read(self.controls)),
        }
    }

    fn items(&self) -> Result<Vec<SelectItem>> {
        let mut items = Vec::with_capacity(self.options.len() + usize::from(self.none_option));
        if self.none_option {
            items.push(SelectItem::none());
        }
        items.extend(self.options.iter().cloned());
        if let Some(value) = first_duplicate(&items) {
            return Err(BindError::DuplicateOption {
                key: self.binding.name().to_owned(),
                value,
            });
        }
        Ok(items)
    }

    /// Renders the dropdown against the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::TypeConversion`] when the bound value is neither
    /// text, a number nor falsy, and [`BindError::DuplicateOption`] when two
    /// items share a value.
    pub fn render(&self) -> Result<SelectView> {
        let build = || -> Result<SelectView> {
            Ok(SelectView {
                id: self.binding.name().to_owned(),
                label: label_for(self.text.as_deref(), self.binding.name()),
                selected: self.selection()?,
                items: self.items()?,
                disabled: self.disabled,
            })
        };
        build().inspect_err(|err| warn!(key = self.binding.name(), %err, "dropdown render failed"))
    }

    /// Handles the user picking the item with `value`.
    ///
    /// Reports `value` to the callback exactly once when it differs from the
    /// current selection. Disabled dropdowns ignore the event.
    ///
    /// # Errors
    ///
    /// Returns any render error, or [`BindError::UnknownOption`] when `value`
    /// is not one of the items.
    pub fn select(&mut self, value: &str) -> Result<Dispatch> {
        if self.disabled {
            debug!(key = self.binding.name(), value, "ignored selection on disabled dropdown");
            return Ok(Dispatch::Disabled);
        }
        let view = self.render()?;
        if !view.contains(value) {
            return Err(BindError::UnknownOption {
                key: self.binding.name().to_owned(),
                value: value.to_owned(),
            });
        }
        if view.selected == value {
            return Ok(Dispatch::Unchanged);
        }
        trace!(key = self.binding.name(), value, "dropdown selection");
        (self.update)(self.binding.key(), value.to_owned());
        Ok(Dispatch::Sent)
    }
}

fn first_duplicate(items: &[SelectItem]) -> Option<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .find(|item| !seen.insert(item.value.as_str()))
        .map(|item| item.value.clone())
}

impl<C, F> Control for DropDownControl<'_, C, F>
where
    C: Controls,
    F: FnMut(&C::Key, String),
{
    fn key_name(&self) -> &str {
        self.binding.name()
    }

    fn view(&self) -> Result<ControlView> {
        self.render().map(ControlView::from)
    }

    fn dispatch(&mut self, event: ChangeEvent) -> Result<Dispatch> {
        match event {
            ChangeEvent::Select(value) => self.select(&value),
            _ => Err(BindError::EventMismatch {
                key: self.binding.name().to_owned(),
                control: "dropdown",
            }),
        }
    }
}

impl<C: Controls, F> fmt::Debug for DropDownControl<'_, C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropDownControl")
            .field("binding", &self.binding)
            .field("options", &self.options)
            .field("text", &self.text)
            .field("disabled", &self.disabled)
            .field("none_option", &self.none_option)
            .finish_non_exhaustive()
    }
}
