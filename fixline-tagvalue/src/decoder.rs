//! Tolerant wire decoder.
//!
//! Splits the input on the field delimiter, then each chunk on `=`.
//! Malformed chunks (no `=`, more than one `=`, a non-numeric tag, or a
//! value that is not valid UTF-8) are silently dropped rather than raising.
//! Trailing delimiters and empty segments are tolerated.

use crate::encoder::SOH;
use fixline_core::field::Field;
use fixline_core::message::Message;
use memchr::memchr;

/// Decodes a wire buffer into a [`Message`].
///
/// Decoding never fails; unparseable chunks are skipped. A buffer that
/// yields no valid fields decodes to an empty message, which later field
/// lookups reject with a missing-tag error.
#[must_use]
pub fn decode(input: &[u8]) -> Message {
    let mut msg = Message::new();

    for chunk in input.split(|&b| b == SOH) {
        if chunk.is_empty() {
            continue;
        }
        if let Some(field) = decode_field(chunk) {
            msg.push(field);
        }
    }

    msg
}

/// Decodes a single `tag=value` chunk, or `None` if malformed.
fn decode_field(chunk: &[u8]) -> Option<Field> {
    let eq_pos = memchr(b'=', chunk)?;
    let value = &chunk[eq_pos + 1..];

    // a second '=' makes the split ambiguous
    if memchr(b'=', value).is_some() {
        return None;
    }

    let tag = parse_tag(&chunk[..eq_pos])?;
    let value = std::str::from_utf8(value).ok()?;

    Some(Field::new(tag, value))
}

/// Parses a tag number from ASCII digits.
#[inline]
fn parse_tag(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || bytes.len() > 10 {
        return None;
    }

    let mut result: u32 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        result = result.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
    }

    Some(result)
}
