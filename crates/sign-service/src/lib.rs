//! Sign Service - upload, sign and history over the burn engine
//!
//! This crate provides:
//! - Service configuration (JSON file plus environment overrides)
//! - Artifact storage for originals and signed outputs
//! - Request/response payloads with the `{success, message, data}` envelope
//! - The signing service that burns, stores and records every step
//! - Sequential multi-signature sessions
//!
//! It is transport agnostic: an HTTP layer only has to deserialize the
//! request payloads, call the `handle_*` methods and write the envelope
//! with its status code.

pub mod api;
mod config;
mod service;
mod session;
mod store;

pub use config::ServiceConfig;
pub use service::{SignedArtifact, SigningService};
pub use session::{SessionSummary, SigningSession};
pub use store::{ArtifactStore, FsArtifactStore, MemoryArtifactStore};

use audit_trail::AuditError;
use field_burn::BurnError;
use thiserror::Error;

/// Errors that can occur in service operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Burn(#[from] BurnError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServiceError {
    /// HTTP-style status code for the error
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Burn(BurnError::Internal(_)) => 500,
            ServiceError::Burn(_) => 400,
            _ => 500,
        }
    }

    /// Whether the error is the caller's fault
    pub fn is_client_error(&self) -> bool {
        self.status() < 500
    }
}

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
