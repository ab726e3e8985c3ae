//! # Fixline
//!
//! A FIX-style session layer engine for Rust.
//!
//! Fixline implements the sequencing and recovery half of a tag=value
//! protocol: logon handshake, gap detection, out-of-order queueing, resend
//! recovery and persistent sequence numbers, independent of any particular
//! socket or message dictionary.
//!
//! ## Features
//!
//! - **Per-session ordering**: every inbound message is validated against
//!   the expected sequence before the application sees it
//! - **Gap recovery**: out-of-order messages queue while a resend request
//!   recovers the gap; replays go out byte-for-byte from the persisted log
//! - **Durable sessions**: sequence counters and sent messages survive
//!   reconnects through a pluggable store
//! - **Async support**: built on Tokio, one lock per session
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fixline::prelude::*;
//!
//! // Create an engine with your application handler
//! let engine = EngineBuilder::new()
//!     .with_role(Role::Acceptor)
//!     .with_application(MyApplication)
//!     .build();
//!
//! // Feed it raw inbound payloads; it routes them by identity
//! engine.dispatch(payload).await?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: fields, messages, identities and error definitions
//! - [`tagvalue`]: tag=value encoding and tolerant decoding
//! - [`store`]: message persistence and sequence checkpoints
//! - [`session`]: session runtime and the logon/recovery protocol engine
//! - [`engine`]: session registry and builder

pub mod core {
    //! Fields, messages, identities and error definitions.
    pub use fixline_core::*;
}

pub mod tagvalue {
    //! Tag=value encoding and tolerant decoding.
    pub use fixline_tagvalue::*;
}

pub mod store {
    //! Message persistence and sequence checkpoints.
    pub use fixline_store::*;
}

pub mod session {
    //! Session runtime and the logon/recovery protocol engine.
    pub use fixline_session::*;
}

pub mod engine {
    //! Session registry and builder.
    pub use fixline_engine::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use fixline_core::{
        DecodeError, Field, FixlineError, Message, MsgType, Result, SessionId, StoreError,
    };

    // Tag-value encoding
    pub use fixline_tagvalue::{Encoder, SOH, decode, encode_message};

    // Store
    pub use fixline_store::{MemoryStore, MessageStore};

    // Session
    pub use fixline_session::{
        Application, MessageHandler, NoOpApplication, ProtocolEngine, Role, Session,
        TransportSender,
    };

    // Engine
    pub use fixline_engine::{EngineBuilder, SessionRegistry};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let field = Field::new(55, "VOD.L");
        let msg: Message = vec![field].into();
        assert_eq!(msg.get(55).unwrap(), "VOD.L");
        let _id = SessionId::new("FIX.4.4", "SENDER", "TARGET");
    }

    #[tokio::test]
    async fn test_end_to_end_logon_and_delivery() {
        use parking_lot::Mutex;
        use std::sync::Arc;

        #[derive(Default)]
        struct CollectingApplication {
            symbols: Mutex<Vec<String>>,
        }

        #[async_trait::async_trait]
        impl Application for CollectingApplication {
            async fn on_message(&self, _session: &mut Session, msg: &Message) {
                self.symbols.lock().push(msg.get(55).unwrap().to_string());
            }
        }

        let builder = EngineBuilder::new()
            .with_role(Role::Acceptor)
            .with_application(CollectingApplication::default());
        let app: Arc<CollectingApplication> = builder.application();
        let registry = builder.build();

        let raw = |text: &str| text.replace('|', "\x01").into_bytes();
        registry
            .dispatch(&raw("8=FIX.4.4|9=0|35=A|34=1|49=BUY|56=SELL|10=000|"))
            .await
            .unwrap();
        // out of order: 3 queues until 2 arrives
        registry
            .dispatch(&raw("8=FIX.4.4|9=0|35=D|34=3|49=BUY|56=SELL|55=BARC.L|10=000|"))
            .await
            .unwrap();
        registry
            .dispatch(&raw("8=FIX.4.4|9=0|35=D|34=2|49=BUY|56=SELL|55=VOD.L|10=000|"))
            .await
            .unwrap();

        let id = SessionId::new("FIX.4.4", "SELL", "BUY");
        let session = registry.get_or_create(&id);
        let session = session.lock().await;
        assert!(session.is_logged_on());
        assert_eq!(session.receive_sequence(), 4);
        assert_eq!(*app.symbols.lock(), vec!["VOD.L", "BARC.L"]);
    }
}
