//! Transport sender port.
//!
//! The byte-level transport (socket accept/connect/read/write, reconnect
//! policy) lives outside this crate. A [`Session`](crate::session::Session)
//! only holds a weak handle to something implementing [`TransportSender`],
//! so a closed transport neither keeps the session alive nor invalidates it.

use async_trait::async_trait;
use bytes::Bytes;
use fixline_core::session_id::SessionId;

/// Outbound side of a transport connection.
///
/// Implementations must be safe to call on an already-closed connection;
/// both operations degrade to a no-op in that case.
#[async_trait]
pub trait TransportSender: Send + Sync {
    /// Writes one encoded message to the connection.
    async fn send(&self, id: &SessionId, message: Bytes);

    /// Closes the connection.
    async fn close(&self, id: &SessionId);
}
