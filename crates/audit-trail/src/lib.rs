//! Audit Trail - append-only record of document transformations
//!
//! Every burn of an uploaded document is recorded as an immutable
//! [`AuditEntry`] holding the hash of the input and the hash of the output.
//! Entries are keyed by artifact id and never updated or deleted.
//!
//! # Example
//!
//! ```ignore
//! use audit_trail::{HashChainRecorder, MemoryAuditLog};
//!
//! let mut recorder = HashChainRecorder::new(MemoryAuditLog::new());
//! recorder.record(&artifact_id, &original_hash, &signed_hash, "/uploads/signed/a.pdf")?;
//! let report = audit_trail::verify_chain(&recorder.history(&artifact_id)?);
//! assert!(report.is_intact());
//! ```

mod entry;
mod recorder;
mod sink;

pub use entry::AuditEntry;
pub use recorder::{verify_chain, ChainBreak, ChainReport, HashChainRecorder};
pub use sink::{AuditSink, JsonlAuditLog, MemoryAuditLog};

use thiserror::Error;

/// Errors that can occur while recording or reading audit entries
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Invalid audit entry: {0}")]
    Validation(String),

    #[error("Corrupt audit log at line {line}: {message}")]
    Corrupt { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;
