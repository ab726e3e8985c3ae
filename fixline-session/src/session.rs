//! Session runtime entity.
//!
//! A [`Session`] owns the live sequence-number state for one counterparty
//! pair and brokers between the transport (outbound) and the protocol
//! engine (inbound). All persistence writes go through it. The session
//! outlives any one transport connection: its identity and counters are
//! independent of the connection, and its counters survive reconnects via
//! the persistence port.

use crate::transport::TransportSender;
use async_trait::async_trait;
use fixline_core::error::{Result, StoreError};
use fixline_core::message::{Message, MsgType};
use fixline_core::session_id::SessionId;
use fixline_store::MessageStore;
use fixline_tagvalue::{decode, encode_message};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Inbound half of a session: consumes messages the session receives.
///
/// Implemented by the protocol engine. The session takes the handler out
/// while dispatching, so handler callbacks get exclusive access to the
/// session without aliasing.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Called for every inbound message.
    async fn on_message(&mut self, session: &mut Session, msg: Message);

    /// Called when a transport is attached.
    async fn on_connect(&mut self, session: &mut Session);

    /// Called when the transport is torn down.
    async fn on_disconnect(&mut self, session: &mut Session);

    /// Returns true if the logon exchange has completed.
    fn is_logged_on(&self) -> bool;
}

/// Persistent logical channel between two named counterparties.
pub struct Session {
    id: SessionId,
    send_sequence: u64,
    receive_sequence: u64,
    transport: Option<Weak<dyn TransportSender>>,
    store: Option<Arc<dyn MessageStore>>,
    handler: Option<Box<dyn MessageHandler>>,
}

impl Session {
    /// Creates a session with no persistence; both counters start at 1.
    #[must_use]
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            send_sequence: 1,
            receive_sequence: 1,
            transport: None,
            store: None,
            handler: None,
        }
    }

    /// Creates a session backed by a persistence store, resuming the
    /// counters the store last recorded.
    #[must_use]
    pub fn with_store(id: SessionId, store: Arc<dyn MessageStore>) -> Self {
        let send_sequence = store.load_send_sequence();
        let receive_sequence = store.load_receive_sequence();
        Self {
            id,
            send_sequence,
            receive_sequence,
            transport: None,
            store: Some(store),
            handler: None,
        }
    }

    /// Attaches the inbound message handler (the protocol engine).
    pub fn attach_handler(&mut self, handler: Box<dyn MessageHandler>) {
        self.handler = Some(handler);
    }

    /// Returns the session identity.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns true if a live transport is attached.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.transport
            .as_ref()
            .is_some_and(|t| t.upgrade().is_some())
    }

    /// Returns true if the attached handler reports the logon exchange
    /// complete. False when no handler is attached.
    #[must_use]
    pub fn is_logged_on(&self) -> bool {
        self.handler.as_ref().is_some_and(|h| h.is_logged_on())
    }

    /// Attaches a transport. Only a weak reference is kept: the session
    /// never keeps the connection alive.
    pub async fn connect(&mut self, transport: &Arc<dyn TransportSender>) {
        self.transport = Some(Arc::downgrade(transport));
        if let Some(mut handler) = self.handler.take() {
            handler.on_connect(self).await;
            self.handler = Some(handler);
        }
    }

    /// Tears down the transport reference, closing the connection if it is
    /// still reachable, and notifies the attached handler so it can reset
    /// logon state. Safe to call repeatedly.
    pub async fn disconnect(&mut self) {
        if let Some(transport) = self.transport.take().and_then(|t| t.upgrade()) {
            transport.close(&self.id).await;
        }
        if let Some(mut handler) = self.handler.take() {
            handler.on_disconnect(self).await;
            self.handler = Some(handler);
        }
    }

    /// Sends a message: stamps the current send sequence, encodes,
    /// persists, and transmits if a transport is attached.
    ///
    /// A missing or closed transport is not an error: the message is still
    /// persisted and the send sequence still advances, so the counterparty
    /// can recover it later through a resend request.
    ///
    /// # Errors
    /// Returns an error only if the persistence write fails.
    pub async fn send(&mut self, msg_type: &MsgType, body: &Message) -> Result<u64> {
        let seq = self.send_sequence;
        let encoded = encode_message(&self.id, msg_type, seq, body);
        debug!(session = %self.id, seq, %msg_type, "send");

        if let Some(store) = &self.store {
            store.store_send_sequence(seq + 1);
            store.store_sent_message(seq, &encoded).await?;
        }

        match self.transport.as_ref().and_then(Weak::upgrade) {
            Some(transport) => transport.send(&self.id, encoded).await,
            None => debug!(session = %self.id, "no transport, message persisted only"),
        }

        self.send_sequence = seq + 1;
        Ok(seq)
    }

    /// Sends a logon message with an empty body. Used by the initiating
    /// side to open the handshake.
    ///
    /// # Errors
    /// Returns an error only if the persistence write fails.
    pub async fn send_logon(&mut self) -> Result<u64> {
        self.send(&MsgType::Logon, &Message::new()).await
    }

    /// Forwards an inbound message to the attached handler. No-op if no
    /// handler is attached.
    pub async fn receive(&mut self, msg: Message) {
        debug!(session = %self.id, "recv: {msg}");
        if let Some(mut handler) = self.handler.take() {
            handler.on_message(self, msg).await;
            self.handler = Some(handler);
        }
    }

    /// Returns the previously sent message stored under `seq`, decoded.
    ///
    /// # Errors
    /// Fails with `StoreError::NotFound` if nothing was sent under `seq`
    /// or no store is attached.
    pub async fn get_sent(&self, seq: u64) -> Result<Message> {
        let store = self
            .store
            .as_ref()
            .ok_or(StoreError::NotFound { seq_num: seq })?;
        let bytes = store.load_sent_message(seq).await?;
        Ok(decode(&bytes))
    }

    /// Retransmits a previously sent message verbatim: the stored bytes go
    /// out unchanged, keeping their original sequence number, and the send
    /// sequence does not advance.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if the message was never sent or not
    /// retained.
    pub async fn resend_stored(&self, seq: u64) -> std::result::Result<(), StoreError> {
        let store = self
            .store
            .as_ref()
            .ok_or(StoreError::NotFound { seq_num: seq })?;
        let bytes = store.load_sent_message(seq).await?;
        debug!(session = %self.id, seq, "resend stored message");
        if let Some(transport) = self.transport.as_ref().and_then(Weak::upgrade) {
            transport.send(&self.id, bytes).await;
        }
        Ok(())
    }

    /// Returns the next expected receive sequence.
    #[inline]
    #[must_use]
    pub fn receive_sequence(&self) -> u64 {
        self.receive_sequence
    }

    /// Sets the next expected receive sequence. Used by the protocol
    /// engine after accepting a message.
    pub fn set_receive_sequence(&mut self, seq: u64) {
        self.receive_sequence = seq;
    }

    /// Sets the next send sequence.
    pub fn set_send_sequence(&mut self, seq: u64) {
        self.send_sequence = seq;
    }

    /// Returns the next send sequence.
    #[inline]
    #[must_use]
    pub fn send_sequence(&self) -> u64 {
        self.send_sequence
    }

    /// Persists the next expected receive sequence as a durability
    /// checkpoint. Used by the protocol engine after successful processing.
    pub fn confirm_receipt(&self, seq: u64) {
        if let Some(store) = &self.store {
            store.store_receive_sequence(seq);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("send_sequence", &self.send_sequence)
            .field("receive_sequence", &self.receive_sequence)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use fixline_core::field::Field;
    use fixline_store::MemoryStore;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<Bytes>>,
        closed: Mutex<bool>,
    }

    #[async_trait]
    impl TransportSender for RecordingTransport {
        async fn send(&self, _id: &SessionId, message: Bytes) {
            self.sent.lock().push(message);
        }

        async fn close(&self, _id: &SessionId) {
            *self.closed.lock() = true;
        }
    }

    fn order(symbol: &str) -> Message {
        vec![Field::new(55, symbol)].into()
    }

    #[tokio::test]
    async fn test_send_sequence_is_monotonic_without_transport() {
        let mut sess = Session::new(SessionId::new("FIX.4.4", "S", "T"));
        assert!(!sess.is_connected());

        for expected in 1..=5 {
            let seq = sess
                .send(&MsgType::Custom("D".into()), &order("VOD.L"))
                .await
                .unwrap();
            assert_eq!(seq, expected);
        }
        assert_eq!(sess.send_sequence(), 6);
    }

    #[tokio::test]
    async fn test_send_persists_and_transmits() {
        let store = Arc::new(MemoryStore::new());
        let transport: Arc<dyn TransportSender> = Arc::new(RecordingTransport::default());

        let mut sess = Session::with_store(SessionId::new("FIX.4.4", "S", "T"), store.clone());
        sess.connect(&transport).await;
        assert!(sess.is_connected());

        sess.send(&MsgType::Custom("D".into()), &order("VOD.L"))
            .await
            .unwrap();

        assert!(store.contains(1));
        assert_eq!(store.load_send_sequence(), 2);
    }

    #[tokio::test]
    async fn test_get_sent_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let mut sess = Session::with_store(SessionId::new("FIX.4.4", "S", "T"), store);

        sess.send(&MsgType::Custom("D".into()), &order("VOD.L"))
            .await
            .unwrap();

        let sent = sess.get_sent(1).await.unwrap();
        assert_eq!(sent.get(35).unwrap(), "D");
        assert_eq!(sent.seq_num().unwrap(), 1);
        assert_eq!(sent.get(55).unwrap(), "VOD.L");

        assert!(sess.get_sent(2).await.is_err());
    }

    #[tokio::test]
    async fn test_counters_survive_reconstruction() {
        let store = Arc::new(MemoryStore::new());
        let id = SessionId::new("FIX.4.4", "S", "T");

        let mut sess = Session::with_store(id.clone(), store.clone());
        sess.send(&MsgType::Custom("D".into()), &order("VOD.L"))
            .await
            .unwrap();
        sess.set_receive_sequence(4);
        sess.confirm_receipt(4);
        drop(sess);

        let sess = Session::with_store(id, store);
        assert_eq!(sess.send_sequence(), 2);
        assert_eq!(sess.receive_sequence(), 4);
        let recovered = sess.get_sent(1).await.unwrap();
        assert_eq!(recovered.get(55).unwrap(), "VOD.L");
    }

    #[tokio::test]
    async fn test_disconnect_closes_transport_and_is_idempotent() {
        let transport = Arc::new(RecordingTransport::default());
        let handle: Arc<dyn TransportSender> = transport.clone();

        let mut sess = Session::new(SessionId::new("FIX.4.4", "S", "T"));
        sess.connect(&handle).await;
        sess.disconnect().await;

        assert!(*transport.closed.lock());
        assert!(!sess.is_connected());
        sess.disconnect().await;
    }

    #[tokio::test]
    async fn test_session_survives_dropped_transport() {
        let mut sess = Session::new(SessionId::new("FIX.4.4", "S", "T"));
        {
            let transport: Arc<dyn TransportSender> = Arc::new(RecordingTransport::default());
            sess.connect(&transport).await;
            assert!(sess.is_connected());
        }
        // transport dropped; the weak handle detects it
        assert!(!sess.is_connected());
        assert!(
            sess.send(&MsgType::Custom("D".into()), &order("VOD.L"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_resend_stored_does_not_advance_sequence() {
        let store = Arc::new(MemoryStore::new());
        let transport = Arc::new(RecordingTransport::default());
        let handle: Arc<dyn TransportSender> = transport.clone();

        let mut sess = Session::with_store(SessionId::new("FIX.4.4", "S", "T"), store);
        sess.connect(&handle).await;
        sess.send(&MsgType::Custom("D".into()), &order("VOD.L"))
            .await
            .unwrap();

        let before = sess.send_sequence();
        sess.resend_stored(1).await.unwrap();
        assert_eq!(sess.send_sequence(), before);

        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 2);
        // retransmission is byte-for-byte identical
        assert_eq!(sent[0], sent[1]);
    }

    #[tokio::test]
    async fn test_receive_without_handler_is_noop() {
        let mut sess = Session::new(SessionId::new("FIX.4.4", "S", "T"));
        sess.receive(order("VOD.L")).await;
    }
}
