//! Value: the runtime primitive carried by channels, variants and outputs.
//! Numbers use f32; strings cover text and pre-normalized color-like values.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named value mapping (channel targets, variant payloads, reported sets).
pub type ValueMap = HashMap<String, Value>;

/// Lightweight kind enum for pattern-matching and quick dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Text,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Scalar float
    Float(f32),

    /// Text / color-like string; step-only for interpolation
    Text(String),
}

/// Mismatch between the requested kind and the stored kind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoercionError {
    #[error("expected a float, found {0:?}")]
    NotFloat(ValueKind),
    #[error("expected text, found {0:?}")]
    NotText(ValueKind),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
        }
    }

    /// Convenience constructors
    pub fn f(v: f32) -> Self {
        Value::Float(v)
    }

    pub fn text(v: impl Into<String>) -> Self {
        Value::Text(v.into())
    }

    pub fn as_float(&self) -> Result<f32, CoercionError> {
        match self {
            Value::Float(v) => Ok(*v),
            other => Err(CoercionError::NotFloat(other.kind())),
        }
    }

    pub fn as_text(&self) -> Result<&str, CoercionError> {
        match self {
            Value::Text(v) => Ok(v),
            other => Err(CoercionError::NotText(other.kind())),
        }
    }
}
