//! Session identity.
//!
//! A logical session is identified by the triple (protocol version,
//! sender-id, target-id). The derived composite key string is the canonical
//! identity used for hashing and equality, so the identity can serve as a
//! registry map key.

use crate::error::DecodeError;
use crate::message::Message;
use crate::tags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies one logical session between two named counterparties.
///
/// Sender and target are directional: a counterparty's inbound identity has
/// sender and target swapped relative to this identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionId {
    protocol: String,
    sender: String,
    target: String,
    key: String,
}

impl SessionId {
    /// Creates a new session identity.
    ///
    /// # Arguments
    /// * `protocol` - Protocol version string (tag 8), e.g. "FIX.4.4"
    /// * `sender` - Sender identifier (tag 49)
    /// * `target` - Target identifier (tag 56)
    #[must_use]
    pub fn new(
        protocol: impl Into<String>,
        sender: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        let protocol = protocol.into();
        let sender = sender.into();
        let target = target.into();
        let key = format!("{protocol}.{sender}.{target}");
        Self {
            protocol,
            sender,
            target,
            key,
        }
    }

    /// Extracts a session identity from an inbound message.
    ///
    /// Scans for tags 8, 49 and 56. The identity is built from the
    /// receiver's point of view, so sender and target are swapped relative
    /// to the fields on the wire.
    ///
    /// # Errors
    /// Returns `DecodeError::MissingIdentity` if any identity field is
    /// absent or empty.
    pub fn from_message(msg: &Message) -> Result<Self, DecodeError> {
        let protocol = msg.get(tags::BEGIN_STRING).ok();
        let sender = msg.get(tags::SENDER_COMP_ID).ok();
        let target = msg.get(tags::TARGET_COMP_ID).ok();

        match (protocol, sender, target) {
            (Some(p), Some(s), Some(t)) if !p.is_empty() && !s.is_empty() && !t.is_empty() => {
                Ok(Self::new(p, t, s))
            }
            _ => Err(DecodeError::MissingIdentity),
        }
    }

    /// Returns the protocol version.
    #[inline]
    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Returns the sender identifier.
    #[inline]
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the target identifier.
    #[inline]
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the composite key string.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the identity of the counterparty: same protocol, sender and
    /// target swapped.
    #[must_use]
    pub fn counterparty(&self) -> Self {
        Self::new(&self.protocol, &self.target, &self.sender)
    }
}

impl PartialEq for SessionId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for SessionId {}

impl Hash for SessionId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}
