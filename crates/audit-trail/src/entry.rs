//! Audit entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded transformation of an artifact
///
/// `original_hash` is the hash of the bytes that went into the burn and
/// `signed_hash` the hash of the bytes that came out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: Uuid,
    pub artifact_id: String,
    pub original_hash: String,
    pub signed_hash: String,
    pub artifact_location: String,
    pub created_at: DateTime<Utc>,
}
