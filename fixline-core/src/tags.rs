//! Well-known field tags used by the session layer.
//!
//! Application payloads may use any tag; the session core itself only ever
//! inspects the tags defined here.

/// BeginString (protocol version), first field of every message.
pub const BEGIN_STRING: u32 = 8;

/// BodyLength, emitted as a placeholder, never computed by this core.
pub const BODY_LENGTH: u32 = 9;

/// CheckSum, emitted as a placeholder, never computed by this core.
pub const CHECK_SUM: u32 = 10;

/// MsgSeqNum, the per-direction monotonic sequence number.
pub const MSG_SEQ_NUM: u32 = 34;

/// MsgType, the message type discriminator.
pub const MSG_TYPE: u32 = 35;

/// SenderCompID, the originating counterparty.
pub const SENDER_COMP_ID: u32 = 49;

/// TargetCompID, the destination counterparty.
pub const TARGET_COMP_ID: u32 = 56;

/// BeginSeqNo, low bound of a resend request range.
pub const BEGIN_SEQ_NO: u32 = 7;

/// EndSeqNo, high bound of a resend request range.
pub const END_SEQ_NO: u32 = 16;
