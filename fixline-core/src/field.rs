//! Field type for tag=value protocol messages.
//!
//! A [`Field`] is a single `(tag, value)` pair. The protocol is text-based:
//! values are stored as strings regardless of their logical type, and any
//! displayable value (integer, float, character, string) normalizes to its
//! textual representation on construction.

use crate::error::DecodeError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One `(tag, value)` pair within a message.
///
/// Equality is structural on both members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    tag: u32,
    value: String,
}

impl Field {
    /// Creates a new field from a tag and any displayable value.
    ///
    /// # Arguments
    /// * `tag` - The field tag number
    /// * `value` - The field value; integers, floats, characters and strings
    ///   all normalize to their textual form
    #[must_use]
    pub fn new(tag: u32, value: impl fmt::Display) -> Self {
        Self {
            tag,
            value: value.to_string(),
        }
    }

    /// Returns the field tag.
    #[inline]
    #[must_use]
    pub const fn tag(&self) -> u32 {
        self.tag
    }

    /// Returns the field value as a string slice.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Parses the value as the specified type.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if parsing fails.
    pub fn parse<T: FromStr>(&self) -> Result<T, DecodeError> {
        self.value
            .parse()
            .map_err(|_| DecodeError::InvalidFieldValue {
                tag: self.tag,
                reason: format!(
                    "failed to parse '{}' as {}",
                    self.value,
                    std::any::type_name::<T>()
                ),
            })
    }

    /// Returns the value as a sequence number.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not a valid
    /// unsigned integer.
    pub fn as_u64(&self) -> Result<u64, DecodeError> {
        self.parse()
    }

    /// Returns the value as a decimal.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not a valid
    /// decimal.
    pub fn as_decimal(&self) -> Result<Decimal, DecodeError> {
        self.parse()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.tag, self.value)
    }
}

impl<V: fmt::Display> From<(u32, V)> for Field {
    fn from((tag, value): (u32, V)) -> Self {
        Self::new(tag, value)
    }
}
