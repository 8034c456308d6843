//! [`Value`] — the canonical dynamic value model shared by both
//! conversion directions.
//!
//! A value is a `Copy` tag plus inline scalar data; strings, binary
//! payloads, and container children all borrow from the [`Zone`] that
//! produced them, the same way every node of one decoded tree shares one
//! owner.

use thiserror::Error;

use crate::Zone;

/// The tag of a [`Value`], used by accessors and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    UInt,
    Int,
    Float,
    Str,
    Bin,
    Arr,
    Map,
}

/// An accessor was invoked against the wrong tag.
///
/// This is a programming-contract violation, not an expected runtime
/// condition.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("expected {expected:?} value, found {actual:?}")]
pub struct TypeError {
    pub expected: Kind,
    pub actual: Kind,
}

/// A dynamically-typed value borrowing all heap data from a [`Zone`].
///
/// The tag fully determines which accessor is valid; the model performs
/// no coercion between tags. `Map` and `Arr` preserve encounter order
/// exactly, and duplicate map keys are kept as distinct pairs.
///
/// Integers are split by sign: `UInt` holds every non-negative integer,
/// `Int` every negative one. The MessagePack engine keeps that invariant
/// on decode regardless of which wire tag carried the number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'z> {
    Null,
    Bool(bool),
    /// Non-negative integer.
    UInt(u64),
    /// Negative integer.
    Int(i64),
    Float(f64),
    /// UTF-8 text.
    Str(&'z str),
    /// Opaque binary data.
    Bin(&'z [u8]),
    /// Ordered sequence of values.
    Arr(&'z [Value<'z>]),
    /// Ordered key/value pairs; keys are generic values, not only strings.
    Map(&'z [(Value<'z>, Value<'z>)]),
}

impl<'z> Value<'z> {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::UInt(_) => Kind::UInt,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::Bin(_) => Kind::Bin,
            Value::Arr(_) => Kind::Arr,
            Value::Map(_) => Kind::Map,
        }
    }

    fn mismatch<T>(&self, expected: Kind) -> Result<T, TypeError> {
        Err(TypeError {
            expected,
            actual: self.kind(),
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Result<bool, TypeError> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => self.mismatch(Kind::Bool),
        }
    }

    pub fn as_u64(&self) -> Result<u64, TypeError> {
        match self {
            Value::UInt(u) => Ok(*u),
            _ => self.mismatch(Kind::UInt),
        }
    }

    pub fn as_i64(&self) -> Result<i64, TypeError> {
        match self {
            Value::Int(i) => Ok(*i),
            _ => self.mismatch(Kind::Int),
        }
    }

    pub fn as_f64(&self) -> Result<f64, TypeError> {
        match self {
            Value::Float(f) => Ok(*f),
            _ => self.mismatch(Kind::Float),
        }
    }

    pub fn as_str(&self) -> Result<&'z str, TypeError> {
        match self {
            Value::Str(s) => Ok(s),
            _ => self.mismatch(Kind::Str),
        }
    }

    pub fn as_bin(&self) -> Result<&'z [u8], TypeError> {
        match self {
            Value::Bin(b) => Ok(b),
            _ => self.mismatch(Kind::Bin),
        }
    }

    pub fn as_arr(&self) -> Result<&'z [Value<'z>], TypeError> {
        match self {
            Value::Arr(items) => Ok(items),
            _ => self.mismatch(Kind::Arr),
        }
    }

    pub fn as_map(&self) -> Result<&'z [(Value<'z>, Value<'z>)], TypeError> {
        match self {
            Value::Map(pairs) => Ok(pairs),
            _ => self.mismatch(Kind::Map),
        }
    }

    /// Copies a string into the zone and wraps it.
    pub fn str_in(zone: &'z Zone, s: &str) -> Value<'z> {
        Value::Str(zone.alloc_str(s))
    }

    /// Copies binary data into the zone and wraps it.
    pub fn bin_in(zone: &'z Zone, bytes: &[u8]) -> Value<'z> {
        Value::Bin(zone.alloc_copy(bytes))
    }
}
