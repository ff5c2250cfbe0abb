//! Traits for the engine's client API.
//!
//! These model the boundary this crate depends on but does not implement:
//! connection establishment, instance discovery and the per-call wire
//! operations. Implementations wrap whatever process or IPC machinery the
//! engine vendor provides. All strings cross this boundary as UTF-16 code
//! units; the session layer converts (see [`crate::text`]).

use matlink_arrays::EngineArray;
use crate::WorkspaceScope;

/// A failed round trip at the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError(message.into())
    }
}

/// Output streams captured during an eval or feval, still in engine encoding.
#[derive(Debug, Clone, Default)]
pub struct RawStreams {
    pub stdout: Vec<u16>,
    pub stderr: Vec<u16>,
}

/// One connected engine instance.
///
/// An endpoint is exclusively owned by the [`crate::Session`] that holds it
/// and must release the underlying connection exactly once when dropped.
/// Engine-side script errors are not transport failures: they come back as
/// text in [`RawStreams::stderr`] with an `Ok` result.
pub trait EngineEndpoint {
    fn get_variable(
        &mut self,
        name: &[u16],
        scope: WorkspaceScope,
    ) -> Result<EngineArray, TransportError>;

    fn set_variable(
        &mut self,
        name: &[u16],
        value: EngineArray,
        scope: WorkspaceScope,
    ) -> Result<(), TransportError>;

    fn eval(&mut self, statement: &[u16]) -> Result<RawStreams, TransportError>;

    fn feval(
        &mut self,
        function: &[u16],
        nargout: usize,
        args: Vec<EngineArray>,
    ) -> Result<(Vec<EngineArray>, RawStreams), TransportError>;
}

/// Factory side of the engine client API.
pub trait EngineConnector {
    /// Connect to a fresh (or default) engine instance.
    fn connect(&self) -> Result<Box<dyn EngineEndpoint>, TransportError>;

    /// Attach to a named shared engine instance.
    fn connect_shared(&self, name: &[u16]) -> Result<Box<dyn EngineEndpoint>, TransportError>;

    /// Enumerate reachable shared engine instances.
    fn discover(&self) -> Result<Vec<Vec<u16>>, TransportError>;
}
