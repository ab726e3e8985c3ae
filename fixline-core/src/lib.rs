//! # Fixline Core
//!
//! Core types, traits, and error definitions for the fixline session engine.
//!
//! This crate provides the fundamental building blocks used across all
//! fixline crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Field and message model**: ordered `(tag, value)` sequences with
//!   first-match lookup
//! - **Session identity**: the (protocol, sender, target) triple that keys
//!   a logical session independently of any transport connection

pub mod error;
pub mod field;
pub mod message;
pub mod session_id;
pub mod tags;

pub use error::{DecodeError, FixlineError, Result, StoreError};
pub use field::Field;
pub use message::{Message, MsgType};
pub use session_id::SessionId;
