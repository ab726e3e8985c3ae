//! Persistence port definition.
//!
//! This module defines the abstract interface for durable sequence counters
//! and the sent-message log, keyed implicitly by the owning session.
//! Concrete backends (in-memory, disk, database) are swappable
//! implementations of this contract.

use async_trait::async_trait;
use bytes::Bytes;
use fixline_core::error::StoreError;

/// Abstract interface for session persistence.
///
/// Sequence counters are stored as *next* values: next-to-send and
/// next-expected-to-receive. Both stores are monotonic: an attempt to
/// store a smaller value than the current one is ignored, so a replayed
/// or reordered checkpoint can never move a counter backwards.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Returns the persisted next send sequence, or 1 if never stored.
    fn load_send_sequence(&self) -> u64;

    /// Returns the persisted next expected receive sequence, or 1 if never
    /// stored.
    fn load_receive_sequence(&self) -> u64;

    /// Persists the next send sequence. Ignores a value smaller than the
    /// current one.
    fn store_send_sequence(&self, seq: u64);

    /// Persists the next expected receive sequence (the durability
    /// checkpoint). Ignores a value smaller than the current one.
    fn store_receive_sequence(&self, seq: u64);

    /// Stores the raw encoded bytes of a sent message under its sequence
    /// number, for later resend.
    ///
    /// # Errors
    /// Returns `StoreError` if the message cannot be stored.
    async fn store_sent_message(&self, seq: u64, message: &[u8]) -> Result<(), StoreError>;

    /// Loads the raw encoded bytes of a previously sent message.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if nothing was sent under `seq` or
    /// the backend did not retain it.
    async fn load_sent_message(&self, seq: u64) -> Result<Bytes, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullStore;

    #[async_trait]
    impl MessageStore for NullStore {
        fn load_send_sequence(&self) -> u64 {
            1
        }

        fn load_receive_sequence(&self) -> u64 {
            1
        }

        fn store_send_sequence(&self, _seq: u64) {}

        fn store_receive_sequence(&self, _seq: u64) {}

        async fn store_sent_message(&self, _seq: u64, _message: &[u8]) -> Result<(), StoreError> {
            Ok(())
        }

        async fn load_sent_message(&self, seq: u64) -> Result<Bytes, StoreError> {
            Err(StoreError::NotFound { seq_num: seq })
        }
    }

    #[tokio::test]
    async fn test_null_store_contract() {
        let store = NullStore;
        assert_eq!(store.load_send_sequence(), 1);
        assert_eq!(store.load_receive_sequence(), 1);
        assert!(store.store_sent_message(1, b"x").await.is_ok());
        assert_eq!(
            store.load_sent_message(1).await,
            Err(StoreError::NotFound { seq_num: 1 })
        );
    }
}
