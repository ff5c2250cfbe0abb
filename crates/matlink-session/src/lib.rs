//! Session protocol against an external numerical engine.
//!
//! A [`Session`] owns exactly one engine connection and sequences synchronous
//! get/set/eval/feval round trips over it, translating every value that
//! crosses the boundary with `matlink-marshal`. The engine's own process and
//! connection machinery is reached through the [`transport`] traits; this
//! crate never spawns or attaches to an engine itself.

use serde::{Deserialize, Serialize};

pub mod script;
pub mod session;
pub mod text;
pub mod transport;

pub use matlink_marshal::{FromEngine, MarshalError, ToEngine};
pub use session::{EvalOutput, Session};
pub use transport::{EngineConnector, EngineEndpoint, RawStreams, TransportError};

/// Variable scope inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceScope {
    /// The caller's default scope.
    Base,
    /// The engine's shared global scope.
    Global,
}

/// Error types for session operations.
///
/// Engine-side script faults are deliberately absent: an error raised by the
/// evaluated statement or invoked function is expected, recoverable,
/// user-facing text and comes back in [`EvalOutput::stderr`] instead.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine was unreachable or the handshake failed.
    #[error("unable to connect to engine: {0}")]
    Connection(String),
    /// One round trip failed at the transport layer; the session stays
    /// usable for subsequent calls.
    #[error("engine transport failure during {op}: {source}")]
    Transport {
        op: &'static str,
        #[source]
        source: TransportError,
    },
    /// A returned array did not match the requested local type.
    #[error(transparent)]
    Marshal(#[from] MarshalError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
