// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The Ula type set.

use std::fmt;

/// A type in the Ula language. Equality is compatibility: there are no
/// implicit conversions between any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Unsigned 8-bit integer (0..=255).
    U8,
    /// Signed 8-bit integer (-128..=127).
    I8,
    /// Boolean, materialized as 0/1 at runtime.
    Bool,
    /// Absence of a value; only valid as a return type.
    Void,
}

impl Type {
    /// True for the two integer types.
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::U8 | Type::I8)
    }

    /// Whether `value` is representable in this type. False for Bool/Void.
    pub fn contains(&self, value: i64) -> bool {
        match self {
            Type::U8 => (0..=255).contains(&value),
            Type::I8 => (-128..=127).contains(&value),
            Type::Bool | Type::Void => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::U8 => "u8",
            Type::I8 => "i8",
            Type::Bool => "bool",
            Type::Void => "void",
        };
        write!(f, "{}", name)
    }
}
