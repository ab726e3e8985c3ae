//! # Fixline Tag-Value
//!
//! Tag=value wire encoding and decoding for the fixline session engine.
//!
//! The wire format is text: `tag=value` pairs separated by the SOH (0x01)
//! delimiter, with the header fields in fixed order and placeholder
//! BodyLength/CheckSum values. Decoding is tolerant: malformed chunks are
//! dropped, never raised.

pub mod decoder;
pub mod encoder;

pub use decoder::decode;
pub use encoder::{Encoder, SOH, encode_message};
