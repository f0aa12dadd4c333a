#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

extern crate self as formbind;

pub mod checkbox;
pub mod control;
pub mod controls;
pub mod dropdown;
pub mod error;
pub mod slider;
pub mod switch;
pub mod value;
pub mod view;

pub use checkbox::CheckboxControl;
pub use control::Control;
pub use controls::{Binding, ControlKey, Controls, Field};
pub use dropdown::DropDownControl;
pub use error::{BindError, Result};
pub use slider::SliderControl;
pub use switch::SwitchControl;
pub use value::{AsFieldValue, FieldValue, NumberValue, SelectValue, ValueKind};
pub use view::{
    ChangeEvent, CheckboxView, ControlView, Dispatch, SelectItem, SelectView, SliderView,
    SwitchView,
};

#[doc(inline)]
pub use formbind_macros::Controls;

pub mod prelude {
    //! The traits and controls most forms need, for a single glob import.
    //!
    //! ```rust
    //! use formbind::prelude::*;
    //! ```
    pub use crate::{
        CheckboxControl, Control, ControlKey, Controls, DropDownControl, Field, SliderControl,
        SwitchControl,
    };
}
