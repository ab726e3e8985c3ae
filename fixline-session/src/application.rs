//! Application listener port.
//!
//! The protocol engine forwards every logged-on, in-sequence, non-control
//! message to an [`Application`], along with connect/disconnect lifecycle
//! notifications. Control messages (logon, resend request) are handled
//! inside the engine and never reach the application, so protocol
//! invariants cannot be bypassed by an application implementation.

use crate::session::Session;
use async_trait::async_trait;
use fixline_core::message::Message;

/// Callback interface for application-level message handling.
#[async_trait]
pub trait Application: Send + Sync {
    /// Called for every accepted application message, in sequence order.
    async fn on_message(&self, session: &mut Session, msg: &Message);

    /// Called when a transport is attached to the session.
    async fn on_connected(&self, _session: &mut Session) {}

    /// Called when the session's transport is torn down.
    async fn on_disconnected(&self, _session: &mut Session) {}
}

/// Default no-op application implementation.
#[derive(Debug, Default)]
pub struct NoOpApplication;

#[async_trait]
impl Application for NoOpApplication {
    async fn on_message(&self, _session: &mut Session, _msg: &Message) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixline_core::session_id::SessionId;

    #[tokio::test]
    async fn test_noop_application() {
        let app = NoOpApplication;
        let mut sess = Session::new(SessionId::new("P", "S", "T"));
        app.on_message(&mut sess, &Message::new()).await;
        app.on_connected(&mut sess).await;
        app.on_disconnected(&mut sess).await;
    }
}
