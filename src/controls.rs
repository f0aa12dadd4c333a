//! The binding contract shared by every control.
//!
//! A control is bound to one field of a caller-owned record. The record is
//! described by [`Controls`], the field by a [`ControlKey`]. Records with a
//! static shape can also hand out typed [`Field`] descriptors, which turn the
//! runtime type check into a compile-time one.

use core::{fmt, hash::BuildHasher};
use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
};

use serde_json::{Map, Value};

use crate::value::{AsFieldValue, FieldValue};

/// Identifies one field of a [`Controls`] record.
pub trait ControlKey: Clone + fmt::Debug {
    /// The field name. Used as the default label and in diagnostics.
    fn name(&self) -> &str;
}

impl ControlKey for &'static str {
    fn name(&self) -> &str {
        self
    }
}

impl ControlKey for String {
    fn name(&self) -> &str {
        self
    }
}

impl ControlKey for Cow<'static, str> {
    fn name(&self) -> &str {
        self
    }
}

/// A record of field values that controls read from.
///
/// The record stays owned by the caller. Controls only borrow it for a render
/// and report edits through their callback; applying an edit is up to whoever
/// owns the record.
///
/// Derive it for structs with `#[derive(Controls)]`.
pub trait Controls {
    /// The type naming a field of this record.
    type Key: ControlKey;

    /// Reads one field. Unknown keys read as [`FieldValue::Absent`].
    fn field(&self, key: &Self::Key) -> FieldValue<'_>;
}

impl<C: Controls + ?Sized> Controls for &C {
    type Key = C::Key;

    fn field(&self, key: &Self::Key) -> FieldValue<'_> {
        (**self).field(key)
    }
}

impl Controls for Map<String, Value> {
    type Key = String;

    fn field(&self, key: &String) -> FieldValue<'_> {
        self.get(key)
            .map_or(FieldValue::Absent, AsFieldValue::as_field_value)
    }
}

impl Controls for Value {
    type Key = String;

    fn field(&self, key: &String) -> FieldValue<'_> {
        match self {
            Self::Object(entries) => entries.field(key),
            _ => FieldValue::Absent,
        }
    }
}

impl<V: AsFieldValue, S: BuildHasher> Controls for HashMap<String, V, S> {
    type Key = String;

    fn field(&self, key: &String) -> FieldValue<'_> {
        self.get(key)
            .map_or(FieldValue::Absent, AsFieldValue::as_field_value)
    }
}

impl<V: AsFieldValue> Controls for BTreeMap<String, V> {
    type Key = String;

    fn field(&self, key: &String) -> FieldValue<'_> {
        self.get(key)
            .map_or(FieldValue::Absent, AsFieldValue::as_field_value)
    }
}

/// A typed descriptor of one field of a statically shaped record.
///
/// `#[derive(Controls)]` generates one per field as an associated constant,
/// e.g. `Settings::MUTED: Field<Settings, bool>`. Binding a checkbox through a
/// `Field<_, bool>` cannot fail at render time.
pub struct Field<C: Controls, V> {
    key: C::Key,
    get: fn(&C) -> V,
}

impl<C: Controls, V> Field<C, V> {
    /// Creates a descriptor from a key and an accessor.
    pub const fn new(key: C::Key, get: fn(&C) -> V) -> Self {
        Self { key, get }
    }

    /// The key this descriptor reads.
    pub const fn key(&self) -> &C::Key {
        &self.key
    }

    /// Reads the field from `controls`.
    pub fn get(&self, controls: &C) -> V {
        (self.get)(controls)
    }
}

impl<C: Controls, V> Clone for Field<C, V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            get: self.get,
        }
    }
}

impl<C: Controls, V> fmt::Debug for Field<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("type", &core::any::type_name::<V>())
            .finish()
    }
}

/// How a control reads the value it displays.
///
/// `V` is the control's own value type (`bool`, `f64` or `String`).
pub enum Binding<'a, C: Controls, V> {
    /// Read through [`Controls::field`] and check the type at render time.
    Key(C::Key),
    /// Read through a typed accessor; the type is checked at compile time.
    Typed {
        /// The bound key, reported to the edit callback.
        key: C::Key,
        /// Accessor producing the control's value.
        read: Box<dyn Fn(&C) -> V + 'a>,
    },
}

impl<'a, C: Controls, V> Binding<'a, C, V> {
    /// Binds through a typed field descriptor, converting its value with `convert`.
    pub fn typed<W: 'a>(field: Field<C, W>, convert: impl Fn(W) -> V + 'a) -> Self
    where
        C: 'a,
    {
        let key = field.key().clone();
        Self::Typed {
            key,
            read: Box::new(move |controls| convert(field.get(controls))),
        }
    }

    /// The bound key.
    pub const fn key(&self) -> &C::Key {
        match self {
            Self::Key(key) | Self::Typed { key, .. } => key,
        }
    }

    /// Name of the bound field.
    pub fn name(&self) -> &str {
        self.key().name()
    }
}

impl<C: Controls, V> fmt::Debug for Binding<'_, C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Self::Typed { key, .. } => f.debug_struct("Typed").field("key", key).finish_non_exhaustive(),
        }
    }
}
