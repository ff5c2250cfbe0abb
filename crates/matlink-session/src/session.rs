//! The session: one engine connection and the synchronous operations on it.

use matlink_arrays::EngineArray;
use matlink_marshal::{decode_all, encode_all, FromEngine, ToEngine};
use serde::{Deserialize, Serialize};

use crate::script;
use crate::text::{from_utf16, to_utf16};
use crate::transport::{EngineConnector, EngineEndpoint, RawStreams, TransportError};
use crate::{EngineError, Result, WorkspaceScope};

/// Captured output of an eval or feval round trip.
///
/// An error raised inside the engine by the evaluated code lands in
/// `stderr`; it is expected, recoverable text, not a session failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalOutput {
    pub stdout: String,
    pub stderr: String,
}

impl EvalOutput {
    fn from_raw(raw: RawStreams) -> Self {
        EvalOutput {
            stdout: from_utf16(&raw.stdout),
            stderr: from_utf16(&raw.stderr),
        }
    }

    /// Whether the engine reported a script fault.
    pub fn faulted(&self) -> bool {
        !self.stderr.is_empty()
    }
}

/// An exclusive connection to one engine instance.
///
/// Every operation is a blocking round trip; `&mut self` keeps at most one
/// in flight. The connection is released exactly once when the session is
/// dropped (endpoint `Drop`). Sessions are independent of each other.
pub struct Session {
    endpoint: Box<dyn EngineEndpoint>,
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

fn transport_err(op: &'static str, source: TransportError) -> EngineError {
    log::warn!("engine {op} failed: {source}");
    EngineError::Transport { op, source }
}

impl Session {
    /// Connect to a fresh (or default) engine instance.
    pub fn connect(connector: &dyn EngineConnector) -> Result<Session> {
        log::info!("starting engine session");
        let endpoint = connector.connect().map_err(|e| {
            log::warn!("engine connection failed: {e}");
            EngineError::Connection(e.0)
        })?;
        Ok(Session { endpoint })
    }

    /// Attach to a named shared engine instance.
    pub fn connect_shared(connector: &dyn EngineConnector, name: &str) -> Result<Session> {
        log::info!("connecting to shared engine session '{name}'");
        let endpoint = connector.connect_shared(&to_utf16(name)).map_err(|e| {
            log::warn!("connection to shared engine session '{name}' failed: {e}");
            EngineError::Connection(format!("shared session '{name}': {}", e.0))
        })?;
        Ok(Session { endpoint })
    }

    /// Enumerate reachable shared engine instances. Needs no session.
    pub fn discover(connector: &dyn EngineConnector) -> Result<Vec<String>> {
        let names = connector
            .discover()
            .map_err(|e| transport_err("discover", e))?;
        Ok(names.iter().map(|n| from_utf16(n)).collect())
    }

    /// Read a variable from the given workspace scope.
    pub fn get_array(&mut self, name: &str, scope: WorkspaceScope) -> Result<EngineArray> {
        self.endpoint
            .get_variable(&to_utf16(name), scope)
            .map_err(|e| transport_err("get_variable", e))
    }

    /// Read a variable and decode it to a local type.
    pub fn get<T: FromEngine>(&mut self, name: &str, scope: WorkspaceScope) -> Result<T> {
        let array = self.get_array(name, scope)?;
        Ok(T::from_engine(&array)?)
    }

    /// Write a variable into the given workspace scope.
    pub fn set_array(
        &mut self,
        name: &str,
        value: EngineArray,
        scope: WorkspaceScope,
    ) -> Result<()> {
        self.endpoint
            .set_variable(&to_utf16(name), value, scope)
            .map_err(|e| transport_err("set_variable", e))
    }

    /// Encode a local value and write it as a variable.
    pub fn set<T: ToEngine>(&mut self, name: &str, value: &T, scope: WorkspaceScope) -> Result<()> {
        self.set_array(name, value.to_engine(), scope)
    }

    /// Execute one script statement, capturing both output streams.
    pub fn eval(&mut self, statement: &str) -> Result<EvalOutput> {
        log::debug!("eval: {statement}");
        let raw = self
            .endpoint
            .eval(&to_utf16(statement))
            .map_err(|e| transport_err("eval", e))?;
        Ok(EvalOutput::from_raw(raw))
    }

    /// Execute several statements as one unit, in the order given.
    pub fn eval_all(&mut self, statements: &[&str]) -> Result<EvalOutput> {
        self.eval(&script::join_statements(statements))
    }

    /// Invoke a remote function, returning its results and captured streams.
    ///
    /// Argument arity is the caller's responsibility; the engine is the
    /// source of truth for validity. A fault raised by the function itself
    /// comes back as text in the output's `stderr` with empty results.
    pub fn invoke_with_output(
        &mut self,
        function: &str,
        nargout: usize,
        args: Vec<EngineArray>,
    ) -> Result<(Vec<EngineArray>, EvalOutput)> {
        log::debug!("feval: {function} (nargout={nargout}, nargin={})", args.len());
        let (results, raw) = self
            .endpoint
            .feval(&to_utf16(function), nargout, args)
            .map_err(|e| transport_err("feval", e))?;
        Ok((results, EvalOutput::from_raw(raw)))
    }

    /// Invoke a remote function, discarding its captured streams.
    pub fn invoke(
        &mut self,
        function: &str,
        nargout: usize,
        args: Vec<EngineArray>,
    ) -> Result<Vec<EngineArray>> {
        Ok(self.invoke_with_output(function, nargout, args)?.0)
    }

    /// Single-argument, single-return invocation.
    pub fn invoke1(&mut self, function: &str, arg: EngineArray) -> Result<EngineArray> {
        let mut results = self.invoke(function, 1, vec![arg])?;
        Ok(results.pop().unwrap_or_default())
    }

    /// Typed invocation: encode one argument, decode one result.
    pub fn call<TRet: FromEngine, TArg: ToEngine>(
        &mut self,
        function: &str,
        arg: &TArg,
    ) -> Result<TRet> {
        let result = self.invoke1(function, arg.to_engine())?;
        Ok(TRet::from_engine(&result)?)
    }

    /// Typed invocation over homogeneous argument and return batches.
    pub fn call_all<TRet: FromEngine, TArg: ToEngine>(
        &mut self,
        function: &str,
        nargout: usize,
        args: &[TArg],
    ) -> Result<Vec<TRet>> {
        let results = self.invoke(function, nargout, encode_all(args))?;
        Ok(decode_all(&results)?)
    }

    /// Plot a value, optionally holding the current axes for overlays.
    pub fn plot<T: ToEngine>(&mut self, value: &T, hold_on: bool) -> Result<()> {
        self.invoke("plot", 0, vec![value.to_engine()])?;
        if hold_on {
            self.eval("hold on")?;
        }
        Ok(())
    }

    /// Save the whole workspace to a file.
    pub fn save(&mut self, file: &str) -> Result<EvalOutput> {
        self.eval(&script::save_statement(file, &[]))
    }

    /// Save selected variables to a file.
    pub fn save_vars(&mut self, file: &str, variables: &[&str]) -> Result<EvalOutput> {
        self.eval(&script::save_statement(file, variables))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // The endpoint's own Drop terminates the connection.
        log::debug!("releasing engine session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_output_from_raw() {
        let raw = RawStreams {
            stdout: "ans = 2".encode_utf16().collect(),
            stderr: Vec::new(),
        };
        let out = EvalOutput::from_raw(raw);
        assert_eq!(out.stdout, "ans = 2");
        assert!(!out.faulted());
    }

    #[test]
    fn test_eval_output_fault_flag() {
        let raw = RawStreams {
            stdout: Vec::new(),
            stderr: "Unrecognized function".encode_utf16().collect(),
        };
        assert!(EvalOutput::from_raw(raw).faulted());
    }
}
