//! Engine builder for fluent configuration.

use crate::registry::{SessionRegistry, StoreFactory};
use fixline_core::session_id::SessionId;
use fixline_session::{Application, NoOpApplication, Role};
use fixline_store::{MemoryStore, MessageStore};
use std::sync::Arc;

/// Builder for configuring a session engine.
///
/// Defaults to an acceptor with in-memory persistence and a no-op
/// application; every part can be swapped before [`build`](Self::build).
pub struct EngineBuilder<A: Application = NoOpApplication> {
    role: Role,
    application: Arc<A>,
    store_factory: Box<StoreFactory>,
}

impl Default for EngineBuilder<NoOpApplication> {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder<NoOpApplication> {
    /// Creates a new engine builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            role: Role::Acceptor,
            application: Arc::new(NoOpApplication),
            store_factory: Box::new(|_| Arc::new(MemoryStore::new())),
        }
    }
}

impl<A: Application + 'static> EngineBuilder<A> {
    /// Sets which side of the logon handshake the engine plays.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Sets the application callback handler.
    #[must_use]
    pub fn with_application<B: Application>(self, application: B) -> EngineBuilder<B> {
        EngineBuilder {
            role: self.role,
            application: Arc::new(application),
            store_factory: self.store_factory,
        }
    }

    /// Sets the factory producing the persistence store for each new
    /// session.
    #[must_use]
    pub fn with_store_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&SessionId) -> Arc<dyn MessageStore> + Send + Sync + 'static,
    {
        self.store_factory = Box::new(factory);
        self
    }

    /// Returns the configured role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the application handler.
    #[must_use]
    pub fn application(&self) -> Arc<A> {
        Arc::clone(&self.application)
    }

    /// Builds the session registry.
    #[must_use]
    pub fn build(self) -> SessionRegistry {
        SessionRegistry::new(self.role, self.application, self.store_factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_builder_default() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.role(), Role::Acceptor);
        let registry = builder.build();
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_engine_builder_custom_store() {
        let shared = Arc::new(MemoryStore::new());
        shared.store_send_sequence(42);

        let store = Arc::clone(&shared);
        let registry = EngineBuilder::new()
            .with_role(Role::Initiator)
            .with_store_factory(move |_| store.clone() as Arc<dyn MessageStore>)
            .build();

        let session = registry.get_or_create(&SessionId::new("FIX.4.4", "S", "T"));
        assert_eq!(session.lock().await.send_sequence(), 42);
    }
}
