//! Hash chain recorder

use crate::entry::AuditEntry;
use crate::sink::AuditSink;
use crate::{AuditError, Result};
use chrono::Utc;
use uuid::Uuid;

/// Records burn transitions into an audit sink
#[derive(Debug)]
pub struct HashChainRecorder<S> {
    sink: S,
}

impl<S: AuditSink> HashChainRecorder<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Record one transition of an artifact
    ///
    /// Stamps a fresh id and the current UTC time, appends the entry to the
    /// sink and returns it. Empty inputs are rejected before anything is
    /// written.
    pub fn record(
        &mut self,
        artifact_id: &str,
        original_hash: &str,
        signed_hash: &str,
        artifact_location: &str,
    ) -> Result<AuditEntry> {
        for (name, value) in [
            ("artifactId", artifact_id),
            ("originalHash", original_hash),
            ("signedHash", signed_hash),
            ("artifactLocation", artifact_location),
        ] {
            if value.trim().is_empty() {
                return Err(AuditError::Validation(format!("{name} must not be empty")));
            }
        }

        let entry = AuditEntry {
            id: Uuid::new_v4(),
            artifact_id: artifact_id.to_string(),
            original_hash: original_hash.to_string(),
            signed_hash: signed_hash.to_string(),
            artifact_location: artifact_location.to_string(),
            created_at: Utc::now(),
        };

        self.sink.append(&entry)?;
        tracing::info!(
            artifact = %entry.artifact_id,
            entry = %entry.id,
            signed_hash = %entry.signed_hash,
            "recorded audit entry"
        );

        Ok(entry)
    }

    /// All entries for an artifact in append order
    pub fn history(&self, artifact_id: &str) -> Result<Vec<AuditEntry>> {
        self.sink.entries(artifact_id)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

/// A step whose input hash does not match the previous step's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainBreak {
    /// Index of the entry in the checked slice
    pub index: usize,
    /// `signed_hash` of the previous entry
    pub expected: String,
    /// `original_hash` of this entry
    pub actual: String,
}

/// Result of checking a sequence of audit entries
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainReport {
    /// Number of entries checked
    pub steps: usize,
    pub breaks: Vec<ChainBreak>,
}

impl ChainReport {
    pub fn is_intact(&self) -> bool {
        self.breaks.is_empty()
    }
}

/// Check that every step starts from the bytes the previous step produced
///
/// Appends never enforce this link, so the report is informational.
pub fn verify_chain(entries: &[AuditEntry]) -> ChainReport {
    let breaks: Vec<ChainBreak> = entries
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0].signed_hash != pair[1].original_hash)
        .map(|(i, pair)| ChainBreak {
            index: i + 1,
            expected: pair[0].signed_hash.clone(),
            actual: pair[1].original_hash.clone(),
        })
        .collect();

    if !breaks.is_empty() {
        tracing::warn!(breaks = breaks.len(), steps = entries.len(), "audit chain has gaps");
    }

    ChainReport {
        steps: entries.len(),
        breaks,
    }
}
