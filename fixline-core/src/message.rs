//! Message model for tag=value protocol messages.
//!
//! A [`Message`] is an ordered sequence of [`Field`]s. Order matters for
//! serialization (header fields first, body, trailer last) but not for field
//! lookup, which returns the first match. [`MsgType`] enumerates the message
//! types the session layer itself understands; everything else is an opaque
//! application payload.

use crate::error::DecodeError;
use crate::field::Field;
use crate::tags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Message type discriminator (tag 35).
///
/// The session core reserves two control types for itself: logon (`"A"`)
/// and resend request (`"2"`). All other values are application payloads
/// forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MsgType {
    /// Logon (A) - session level handshake.
    Logon,
    /// Resend Request (2) - session level gap recovery.
    ResendRequest,
    /// Application-defined message type.
    Custom(String),
}

impl MsgType {
    /// Returns the string representation of this message type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Logon => "A",
            Self::ResendRequest => "2",
            Self::Custom(s) => s.as_str(),
        }
    }

    /// Returns true if this is a session-level control message.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Logon | Self::ResendRequest)
    }
}

impl std::str::FromStr for MsgType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "A" => Self::Logon,
            "2" => Self::ResendRequest,
            other => Self::Custom(other.to_string()),
        })
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An ordered sequence of fields.
///
/// Equality is structural and order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    fields: SmallVec<[Field; 16]>,
}

impl Message {
    /// Creates an empty message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field to the message.
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Returns an iterator over all fields in order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Returns the number of fields in the message.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the message has no fields.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the first field with the given tag, or `None`.
    #[must_use]
    pub fn find(&self, tag: u32) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag() == tag)
    }

    /// Returns the value of the first field with the given tag.
    ///
    /// # Errors
    /// Returns `DecodeError::MissingField` if no field carries the tag.
    /// A missing required tag aborts processing of the message; it must
    /// never crash the session.
    pub fn get(&self, tag: u32) -> Result<&str, DecodeError> {
        self.find(tag)
            .map(Field::value)
            .ok_or(DecodeError::MissingField { tag })
    }

    /// Returns the value of the first field with the given tag, parsed
    /// as an unsigned integer.
    ///
    /// # Errors
    /// Returns `DecodeError` if the field is missing or not an integer.
    pub fn get_u64(&self, tag: u32) -> Result<u64, DecodeError> {
        self.find(tag)
            .ok_or(DecodeError::MissingField { tag })?
            .as_u64()
    }

    /// Returns the message type carried in tag 35.
    ///
    /// # Errors
    /// Returns `DecodeError::MissingField` if tag 35 is absent.
    pub fn msg_type(&self) -> Result<MsgType, DecodeError> {
        // MsgType::from_str is infallible
        Ok(self.get(tags::MSG_TYPE)?.parse().unwrap())
    }

    /// Returns the sequence number carried in tag 34.
    ///
    /// # Errors
    /// Returns `DecodeError` if tag 34 is absent or not an integer.
    pub fn seq_num(&self) -> Result<u64, DecodeError> {
        self.get_u64(tags::MSG_SEQ_NUM)
    }
}

impl From<Vec<Field>> for Message {
    fn from(fields: Vec<Field>) -> Self {
        Self {
            fields: SmallVec::from_vec(fields),
        }
    }
}

impl FromIterator<Field> for Message {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Message {
    /// Human-readable form, `tag=value|...`, used for logs and assertions.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            write!(f, "{field}|")?;
        }
        Ok(())
    }
}
