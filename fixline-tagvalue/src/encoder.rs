//! Wire encoder.
//!
//! Builds messages in the delimited `tag=value` format with the required
//! leading fields in fixed order: BeginString (8), BodyLength (9),
//! MsgType (35), MsgSeqNum (34), SenderCompID (49), TargetCompID (56),
//! then the body fields in caller-supplied order, then CheckSum (10).
//!
//! BodyLength and CheckSum are emitted as fixed placeholders; computing
//! them is outside this core.

use bytes::{BufMut, Bytes, BytesMut};
use fixline_core::message::{Message, MsgType};
use fixline_core::session_id::SessionId;
use fixline_core::tags;

/// SOH (Start of Header) delimiter separating fields on the wire.
pub const SOH: u8 = 0x01;

/// Placeholder value emitted for BodyLength (tag 9).
pub const BODY_LENGTH_PLACEHOLDER: &str = "0";

/// Placeholder value emitted for CheckSum (tag 10).
pub const CHECK_SUM_PLACEHOLDER: &str = "000";

/// Wire message encoder.
///
/// Appends fields in `tag=value` form to an internal buffer. Callers
/// normally go through [`encode_message`]; the encoder itself is exposed
/// for collaborators that frame their own messages.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: BytesMut,
}

impl Encoder {
    /// Creates a new encoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(256),
        }
    }

    /// Appends a field with a string value.
    #[inline]
    pub fn put_str(&mut self, tag: u32, value: &str) {
        self.put_raw(tag, value.as_bytes());
    }

    /// Appends a field with an unsigned integer value.
    #[inline]
    pub fn put_uint(&mut self, tag: u32, value: u64) {
        let mut buf = itoa::Buffer::new();
        let s = buf.format(value);
        self.put_raw(tag, s.as_bytes());
    }

    /// Appends a field with raw value bytes.
    #[inline]
    pub fn put_raw(&mut self, tag: u32, value: &[u8]) {
        let mut tag_buf = itoa::Buffer::new();
        let tag_str = tag_buf.format(tag);

        self.buf.put_slice(tag_str.as_bytes());
        self.buf.put_u8(b'=');
        self.buf.put_slice(value);
        self.buf.put_u8(SOH);
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }

    /// Returns the current buffer length.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been encoded yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// Encodes one complete message for the given session identity.
///
/// # Arguments
/// * `id` - Session identity supplying BeginString, sender and target
/// * `msg_type` - Message type (tag 35)
/// * `seq` - Sequence number to stamp into tag 34
/// * `body` - Body fields, emitted after the header in caller order
#[must_use]
pub fn encode_message(id: &SessionId, msg_type: &MsgType, seq: u64, body: &Message) -> Bytes {
    let mut enc = Encoder::new();

    enc.put_str(tags::BEGIN_STRING, id.protocol());
    enc.put_str(tags::BODY_LENGTH, BODY_LENGTH_PLACEHOLDER);
    enc.put_str(tags::MSG_TYPE, msg_type.as_str());
    enc.put_uint(tags::MSG_SEQ_NUM, seq);
    enc.put_str(tags::SENDER_COMP_ID, id.sender());
    enc.put_str(tags::TARGET_COMP_ID, id.target());

    for field in body.fields() {
        enc.put_str(field.tag(), field.value());
    }

    enc.put_str(tags::CHECK_SUM, CHECK_SUM_PLACEHOLDER);
    enc.finish()
}
