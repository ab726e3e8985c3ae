//! Logon/recovery protocol engine.
//!
//! The engine consumes inbound messages from a [`Session`], validates their
//! sequence numbers, and decides accept / queue / reject / resend. It is the
//! only writer of the session's logon state and of the pending-message
//! queue.
//!
//! Every rejection path (stale sequence, non-logon first message,
//! non-contiguous gap, unparseable message) converges on the same logoff
//! action. A message is either accepted fully (advance, dispatch,
//! checkpoint) or the connection is torn down; there is no partial-failure
//! state. Retry is the counterparty's responsibility on reconnect.

use crate::application::Application;
use crate::session::{MessageHandler, Session};
use async_trait::async_trait;
use fixline_core::field::Field;
use fixline_core::message::{Message, MsgType};
use fixline_core::tags;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which side of the logon handshake this engine plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Accepts inbound logons and replies with a logon acknowledgement.
    Acceptor,
    /// Initiates the logon; does not acknowledge the peer's logon.
    Initiator,
}

/// Per-session logon and gap-recovery state machine.
///
/// The pending queue holds messages received out of order, strictly sorted
/// by sequence ascending with consecutive entries differing by exactly 1.
/// A gap that cannot keep that invariant is rejected immediately, never
/// stored. A resend request is considered outstanding while the queue is
/// non-empty.
pub struct ProtocolEngine {
    role: Role,
    logged_on: bool,
    queue: VecDeque<(u64, Message)>,
    application: Arc<dyn Application>,
}

impl ProtocolEngine {
    /// Creates an engine in the logged-off state.
    #[must_use]
    pub fn new(role: Role, application: Arc<dyn Application>) -> Self {
        Self {
            role,
            logged_on: false,
            queue: VecDeque::new(),
            application,
        }
    }

    /// Returns the number of messages waiting for a gap to be filled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Accepts an in-sequence message, then drains the pending queue while
    /// its head matches the new expected sequence. Iterative, so a long
    /// backlog cannot grow the call stack.
    async fn accept(&mut self, session: &mut Session, msg: Message, seq: u64) {
        self.process_one(session, msg, seq).await;

        while self.logged_on
            && self
                .queue
                .front()
                .is_some_and(|(head, _)| *head == session.receive_sequence())
        {
            if let Some((seq, msg)) = self.queue.pop_front() {
                self.process_one(session, msg, seq).await;
            }
        }
    }

    /// Processes exactly one accepted message: advance the expected
    /// sequence, checkpoint it, then dispatch by type.
    async fn process_one(&mut self, session: &mut Session, msg: Message, seq: u64) {
        debug!(seq, "processing message");
        session.set_receive_sequence(seq + 1);
        session.confirm_receipt(seq + 1);

        match msg.msg_type() {
            Ok(MsgType::ResendRequest) => self.fulfill_resend(session, &msg).await,
            Ok(MsgType::Logon) => {
                // receipt bookkeeping only; no state change
            }
            Ok(MsgType::Custom(_)) => self.application.on_message(session, &msg).await,
            Err(_) => self.logoff(session).await,
        }
    }

    /// Replays the requested range from the session's persisted log,
    /// verbatim. A request for a message the store did not retain is
    /// unrecoverable and tears the connection down.
    async fn fulfill_resend(&mut self, session: &mut Session, msg: &Message) {
        let range = (
            msg.get_u64(tags::BEGIN_SEQ_NO),
            msg.get_u64(tags::END_SEQ_NO),
        );
        let (low, high) = match range {
            (Ok(low), Ok(high)) => (low, high),
            _ => {
                warn!("resend request with malformed range");
                self.logoff(session).await;
                return;
            }
        };

        debug!(low, high, "fulfilling resend request");
        for seq in low..=high {
            if let Err(err) = session.resend_stored(seq).await {
                warn!(seq, %err, "cannot fulfill resend");
                self.logoff(session).await;
                return;
            }
        }
    }

    async fn receive_while_logged_on(&mut self, session: &mut Session, msg: Message, seq: u64) {
        let expected = session.receive_sequence();
        if seq == expected {
            self.accept(session, msg, seq).await;
        } else {
            // gap: queue the message; request a resend only if none is
            // outstanding (queue was empty before this insertion)
            if self.enqueue(session, msg, seq).await && self.queue.len() == 1 {
                self.send_resend(session, expected, seq - 1).await;
            }
        }
    }

    async fn receive_while_logged_off(&mut self, session: &mut Session, msg: Message, seq: u64) {
        match msg.msg_type() {
            Ok(MsgType::Logon) => {
                let expected = session.receive_sequence();
                debug!(session = %session.id(), "session logged on");
                self.logged_on = true;

                if self.role == Role::Acceptor
                    && session.send(&MsgType::Logon, &Message::new()).await.is_err()
                {
                    self.logoff(session).await;
                    return;
                }

                if seq == expected {
                    self.accept(session, msg, seq).await;
                } else {
                    // the logon itself completes the handshake without
                    // being queued; the gap below it is recovered by resend
                    self.send_resend(session, expected, seq - 1).await;
                }
            }
            _ => {
                debug!("first message is not a logon");
                self.logoff(session).await;
            }
        }
    }

    /// Appends an out-of-order message to the pending queue, enforcing
    /// contiguity: a new entry must follow the current tail by exactly 1.
    /// Returns false (after forcing logoff) on a contiguity violation.
    async fn enqueue(&mut self, session: &mut Session, msg: Message, seq: u64) -> bool {
        debug!(seq, "queueing message");
        if let Some((tail, _)) = self.queue.back() {
            if seq != tail + 1 {
                debug!(
                    tail,
                    seq, "queued sequences would not be contiguous, rejecting"
                );
                self.logoff(session).await;
                return false;
            }
        }
        self.queue.push_back((seq, msg));
        true
    }

    async fn send_resend(&mut self, session: &mut Session, low: u64, high: u64) {
        debug!(low, high, "requesting resend");
        let body: Message = vec![
            Field::new(tags::BEGIN_SEQ_NO, low),
            Field::new(tags::END_SEQ_NO, high),
        ]
        .into();
        if session.send(&MsgType::ResendRequest, &body).await.is_err() {
            self.logoff(session).await;
        }
    }

    /// Forces the session back to logged-off: clears the pending queue and
    /// tears the transport down. Idempotent and safe from any state.
    async fn logoff(&mut self, session: &mut Session) {
        debug!(session = %session.id(), "session logged off");
        self.logged_on = false;
        self.queue.clear();
        session.disconnect().await;
        self.application.on_disconnected(session).await;
    }
}

#[async_trait]
impl MessageHandler for ProtocolEngine {
    async fn on_message(&mut self, session: &mut Session, msg: Message) {
        let seq = match (msg.seq_num(), msg.msg_type()) {
            (Ok(seq), Ok(_)) => seq,
            _ => {
                // an unparseable message is a protocol violation, not a
                // crash: same resolution as any other rejection
                warn!(session = %session.id(), "unparseable message: {msg}");
                self.logoff(session).await;
                return;
            }
        };

        let expected = session.receive_sequence();
        if seq < expected {
            // duplicate delivery below the watermark cannot be reconciled
            debug!(seq, expected, "received sequence is too low");
            self.logoff(session).await;
        } else if self.logged_on {
            self.receive_while_logged_on(session, msg, seq).await;
        } else {
            self.receive_while_logged_off(session, msg, seq).await;
        }
    }

    async fn on_connect(&mut self, session: &mut Session) {
        self.application.on_connected(session).await;
    }

    async fn on_disconnect(&mut self, session: &mut Session) {
        self.logged_on = false;
        self.queue.clear();
        self.application.on_disconnected(session).await;
    }

    fn is_logged_on(&self) -> bool {
        self.logged_on
    }
}
