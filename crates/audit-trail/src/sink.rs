//! Append-only audit sinks

use crate::entry::AuditEntry;
use crate::{AuditError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Storage for audit entries
///
/// Implementations only ever append; there is no update or delete.
pub trait AuditSink {
    /// Persist one entry after all previously appended entries
    fn append(&mut self, entry: &AuditEntry) -> Result<()>;

    /// All entries for an artifact in append order
    fn entries(&self, artifact_id: &str) -> Result<Vec<AuditEntry>>;
}

impl<T: AuditSink + ?Sized> AuditSink for Box<T> {
    fn append(&mut self, entry: &AuditEntry) -> Result<()> {
        (**self).append(entry)
    }

    fn entries(&self, artifact_id: &str) -> Result<Vec<AuditEntry>> {
        (**self).entries(artifact_id)
    }
}

/// In-memory log
#[derive(Debug, Default, Clone)]
pub struct MemoryAuditLog {
    entries: Vec<AuditEntry>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AuditSink for MemoryAuditLog {
    fn append(&mut self, entry: &AuditEntry) -> Result<()> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn entries(&self, artifact_id: &str) -> Result<Vec<AuditEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.artifact_id == artifact_id)
            .cloned()
            .collect())
    }
}

/// File-backed log with one JSON object per line
///
/// The file is opened in append mode for every write and re-read for every
/// lookup, so several processes appending whole lines see each other's
/// entries.
#[derive(Debug, Clone)]
pub struct JsonlAuditLog {
    path: PathBuf,
}

impl JsonlAuditLog {
    /// Open a log, creating the file and its parent directories if needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<AuditEntry>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut entries = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| AuditError::Corrupt {
                line: index + 1,
                message: e.to_string(),
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }
}

impl AuditSink for JsonlAuditLog {
    fn append(&mut self, entry: &AuditEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    fn entries(&self, artifact_id: &str) -> Result<Vec<AuditEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| e.artifact_id == artifact_id)
            .collect())
    }
}
