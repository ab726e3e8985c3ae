//! # Fixline Engine
//!
//! Engine-level orchestration for the Fixline session layer.
//!
//! This crate provides:
//! - **Session registry**: one lazily created session per counterparty identity
//! - **Dispatch**: raw payload routing from identity fields to the owning session
//! - **Builder**: fluent configuration of role, application and persistence

pub mod builder;
pub mod registry;

pub use builder::EngineBuilder;
pub use registry::{SessionRegistry, StoreFactory};
