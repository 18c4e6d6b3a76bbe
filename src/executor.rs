//! Injected executor boundary: the core emits SQL text, the executor runs it.

use thiserror::Error;

/// One fetched row: ordered (column name, raw value) pairs.
///
/// Position is the contract the materializer relies on (values align to the
/// built query's field manifest, left to right); the names are kept for
/// metadata probes and diagnostics.
pub type Row = Vec<(String, Option<String>)>;

/// Opaque executor failure (constraint violation, connection loss, ...).
/// The core propagates these unchanged and never retries.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ExecError(#[from] pub Box<dyn std::error::Error + Send + Sync>);

impl ExecError {
    pub fn message(msg: impl Into<String>) -> Self {
        ExecError(msg.into().into())
    }
}

/// Runs a finished SQL string against some backend and returns its rows.
///
/// Synchronous by design: the core is single-threaded and treats execution as
/// one opaque blocking call. Connection-level timeouts belong to implementors.
pub trait Executor {
    fn execute(&self, sql: &str) -> Result<Vec<Row>, ExecError>;
}
