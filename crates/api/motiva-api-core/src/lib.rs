//! motiva-api-core: the value model shared by the orchestration core and
//! its adapters. Values arrive already normalized to animatable primitives;
//! unit/color parsing belongs to the host layer.

pub mod value;

pub use value::{CoercionError, Value, ValueKind, ValueMap};
