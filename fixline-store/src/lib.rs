//! # Fixline Store
//!
//! Message persistence for the fixline session engine.
//!
//! This crate provides:
//! - **MessageStore trait**: the persistence port for durable sequence
//!   counters plus a sent-message log keyed by sequence number
//! - **MemoryStore**: in-memory backend for tests and non-durable sessions

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::MessageStore;
