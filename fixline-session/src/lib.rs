//! # Fixline Session
//!
//! Session layer for the Fixline engine.
//!
//! This crate provides:
//! - **Session**: sequence-numbered, persistent channel between two counterparties
//! - **Protocol engine**: logon handshake, gap detection and resend recovery
//! - **Application port**: callbacks for in-order business messages
//! - **Transport port**: outbound byte sink abstracted from any socket type

pub mod application;
pub mod protocol;
pub mod session;
pub mod transport;

pub use application::{Application, NoOpApplication};
pub use protocol::{ProtocolEngine, Role};
pub use session::{MessageHandler, Session};
pub use transport::TransportSender;
