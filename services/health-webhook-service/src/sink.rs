//! Operational log sink for receipt records.

use thiserror::Error;

pub const RECEIPT_TARGET: &str = "receipt";

#[derive(Debug, Error)]
#[error("log sink unavailable: {0}")]
pub struct SinkError(pub String);

/// Destination for human-readable receipt records. Appends are best-effort.
pub trait LogSink: Send + Sync {
    fn append(&self, line: &str) -> Result<(), SinkError>;
}

/// Emits each record as a tracing event, so it lands wherever the
/// subscriber writes (stdout and the rolling log file).
pub struct TracingSink;

impl LogSink for TracingSink {
    fn append(&self, line: &str) -> Result<(), SinkError> {
        tracing::info!(target: RECEIPT_TARGET, "\n{line}");
        Ok(())
    }
}
