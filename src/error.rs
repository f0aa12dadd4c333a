//! Errors raised when a control cannot honour its binding.
//!
//! A binding error is an integration bug, not a user mistake: the control
//! refuses to render (or to forward an event) instead of showing data it
//! cannot represent. Callers are expected to surface it, not recover from it.

use thiserror::Error;

use crate::value::ValueKind;

/// Result type used throughout `formbind`.
pub type Result<T, E = BindError> = core::result::Result<T, E>;

/// Failure of a control to bind to its field.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum BindError {
    /// The bound field does not hold the type the control displays.
    #[error("Key {key} is not a {expected} (found {found})")]
    TypeMismatch {
        /// Name of the bound field.
        key: String,
        /// The type the control requires.
        expected: ValueKind,
        /// The type the field actually holds.
        found: ValueKind,
    },
    /// A dropdown value is neither text, a number, nor falsy.
    #[error("value of {value} could not be converted to a string (key {key})")]
    TypeConversion {
        /// Name of the bound field.
        key: String,
        /// Rendering of the offending value.
        value: String,
    },
    /// A selection named a value that is not one of the dropdown's items.
    #[error("{value:?} is not an option of {key}")]
    UnknownOption {
        /// Name of the bound field.
        key: String,
        /// The value that was selected.
        value: String,
    },
    /// Two dropdown items share a value.
    #[error("option {value:?} of {key} is listed more than once")]
    DuplicateOption {
        /// Name of the bound field.
        key: String,
        /// The repeated value.
        value: String,
    },
    /// Slider bounds that no widget can represent.
    #[error("invalid range for {key}: min {min}, max {max}, step {step:?}")]
    InvalidRange {
        /// Name of the bound field.
        key: String,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Step, if any.
        step: Option<f64>,
    },
    /// A change event of the wrong shape was routed to a control.
    #[error("{control} bound to {key} cannot handle this change event")]
    EventMismatch {
        /// Name of the bound field.
        key: String,
        /// Which control received the event.
        control: &'static str,
    },
}

impl BindError {
    pub(crate) fn mismatch(key: &str, expected: ValueKind, found: ValueKind) -> Self {
        Self::TypeMismatch {
            key: key.to_owned(),
            expected,
            found,
        }
    }

    /// Name of the field the failing control was bound to.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::TypeMismatch { key, .. }
            | Self::TypeConversion { key, .. }
            | Self::UnknownOption { key, .. }
            | Self::DuplicateOption { key, .. }
            | Self::InvalidRange { key, .. }
            | Self::EventMismatch { key, .. } => key,
        }
    }
}
