//! In-memory persistence backend.
//!
//! Suitable for tests and for sessions that do not need to survive a
//! process restart. All data is lost when the store is dropped.

use crate::traits::MessageStore;
use async_trait::async_trait;
use bytes::Bytes;
use fixline_core::error::StoreError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// In-memory message store.
///
/// Messages live in a `BTreeMap` keyed by sequence number; counters are
/// atomics updated with `fetch_max` so stores stay monotonic without a lock.
#[derive(Debug)]
pub struct MemoryStore {
    messages: RwLock<BTreeMap<u64, Bytes>>,
    send_sequence: AtomicU64,
    receive_sequence: AtomicU64,
}

impl MemoryStore {
    /// Creates a new empty store with both counters at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(BTreeMap::new()),
            send_sequence: AtomicU64::new(1),
            receive_sequence: AtomicU64::new(1),
        }
    }

    /// Returns the number of stored messages.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.read().len()
    }

    /// Returns true if a message is stored under the given sequence number.
    #[must_use]
    pub fn contains(&self, seq: u64) -> bool {
        self.messages.read().contains_key(&seq)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    fn load_send_sequence(&self) -> u64 {
        self.send_sequence.load(Ordering::SeqCst)
    }

    fn load_receive_sequence(&self) -> u64 {
        self.receive_sequence.load(Ordering::SeqCst)
    }

    fn store_send_sequence(&self, seq: u64) {
        debug!(seq, "persist send sequence");
        self.send_sequence.fetch_max(seq, Ordering::SeqCst);
    }

    fn store_receive_sequence(&self, seq: u64) {
        debug!(seq, "persist receive sequence");
        self.receive_sequence.fetch_max(seq, Ordering::SeqCst);
    }

    async fn store_sent_message(&self, seq: u64, message: &[u8]) -> Result<(), StoreError> {
        debug!(seq, len = message.len(), "persist sent message");
        self.messages
            .write()
            .insert(seq, Bytes::copy_from_slice(message));
        Ok(())
    }

    async fn load_sent_message(&self, seq: u64) -> Result<Bytes, StoreError> {
        self.messages
            .read()
            .get(&seq)
            .cloned()
            .ok_or(StoreError::NotFound { seq_num: seq })
    }
}
