//! Session registry.
//!
//! The registry owns every live [`Session`] and hands out exactly one
//! instance per identity. Sessions are created lazily on first reference,
//! already wired with a persistence store and a protocol engine, so two
//! messages for the same counterparty pair always land on the same state.
//!
//! Each session sits behind its own `tokio::sync::Mutex`: processing within
//! a session is serialized, distinct sessions proceed independently.

use fixline_core::error::DecodeError;
use fixline_core::session_id::SessionId;
use fixline_session::{Application, ProtocolEngine, Role, Session, TransportSender};
use fixline_store::MessageStore;
use fixline_tagvalue::decode;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Produces the persistence store backing a newly created session.
pub type StoreFactory = dyn Fn(&SessionId) -> Arc<dyn MessageStore> + Send + Sync;

/// One session per identity, created on demand.
pub struct SessionRegistry {
    role: Role,
    application: Arc<dyn Application>,
    store_factory: Box<StoreFactory>,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>,
}

impl SessionRegistry {
    /// Creates a registry that builds sessions with the given role,
    /// application and store factory.
    #[must_use]
    pub fn new(
        role: Role,
        application: Arc<dyn Application>,
        store_factory: Box<StoreFactory>,
    ) -> Self {
        Self {
            role,
            application,
            store_factory,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the session for `id`, creating it on first use. Repeated
    /// calls with the same identity return the same instance.
    #[must_use]
    pub fn get_or_create(&self, id: &SessionId) -> Arc<Mutex<Session>> {
        if let Some(session) = self.sessions.read().get(id) {
            return Arc::clone(session);
        }

        let mut sessions = self.sessions.write();
        // racing creators resolve to whichever inserted first
        Arc::clone(sessions.entry(id.clone()).or_insert_with(|| {
            debug!(session = %id, "creating session");
            let store = (self.store_factory)(id);
            let mut session = Session::with_store(id.clone(), store);
            session.attach_handler(Box::new(ProtocolEngine::new(
                self.role,
                Arc::clone(&self.application),
            )));
            Arc::new(Mutex::new(session))
        }))
    }

    /// Returns the session for `id` if it already exists.
    #[must_use]
    pub fn get(&self, id: &SessionId) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().get(id).map(Arc::clone)
    }

    /// Decodes a raw inbound payload, resolves its session from the
    /// identity fields, and feeds it to that session's protocol engine.
    ///
    /// # Errors
    /// Returns `DecodeError::MissingIdentity` if the payload does not carry
    /// the fields needed to name a session. Everything else, including
    /// protocol violations, is resolved inside the session.
    pub async fn dispatch(&self, payload: &[u8]) -> Result<(), DecodeError> {
        let msg = decode(payload);
        let id = SessionId::from_message(&msg)?;
        let session = self.get_or_create(&id);
        session.lock().await.receive(msg).await;
        Ok(())
    }

    /// Attaches a transport to the session for `id`, creating the session
    /// if needed.
    pub async fn connect(&self, id: &SessionId, transport: &Arc<dyn TransportSender>) {
        let session = self.get_or_create(id);
        session.lock().await.connect(transport).await;
    }

    /// Number of sessions created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Returns true if no session has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("role", &self.role)
            .field("sessions", &self.len())
            .finish_non_exhaustive()
    }
}
