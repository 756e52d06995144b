//! Recommended API entrypoints grouped by the side of the contract you are
//! on.
//!
//! `host` is what bot-runtime code needs day to day. `backend` is the
//! escape hatch for wiring up a custom backing session.

pub mod host {
    //! Surface for bot-runtime host code: build a handle, mutate the
    //! mappings, drive checkpoints and flushes.
    pub use crate::{
        ConversationKey, PersistError, PersistenceHandle, Result, SessionConfig,
    };
}

pub mod backend {
    //! Escape hatch for custom backing-session implementations.
    pub use crate::{ExecOutcome, PostgresSession, ScopedSession, SessionKind};
}
