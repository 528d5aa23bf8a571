//! Signing service

use crate::api::{
    ApiResponse, HistoryResponse, SignRequest, SignResponse, UploadRequest, UploadResponse,
    MSG_COORDINATES_MISSING, MSG_INVALID_IMAGE, MSG_SIGN_MISSING, MSG_UPLOAD_MISSING,
};
use crate::config::ServiceConfig;
use crate::store::{ArtifactStore, FsArtifactStore, MemoryArtifactStore};
use crate::{Result, ServiceError};
use audit_trail::{verify_chain, AuditSink, HashChainRecorder, JsonlAuditLog, MemoryAuditLog};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use field_burn::{
    artifact_id, burn, burn_one, content_hash, decode_image_payload, BurnError, BurnOutput,
    Coordinates, Field,
};
use pdf_core::PdfDocument;

/// A stored burn output and the response describing it
#[derive(Debug, Clone)]
pub struct SignedArtifact {
    pub response: SignResponse,
    pub bytes: Vec<u8>,
}

/// Upload, sign and history operations
///
/// Every successful sign stores the output under the signed namespace and
/// appends one audit entry. Inputs are validated before anything is
/// written, and a signed file whose audit entry cannot be appended is
/// removed again, so a failed call leaves the store and the log untouched.
pub struct SigningService<St, Si> {
    config: ServiceConfig,
    store: St,
    recorder: HashChainRecorder<Si>,
}

impl SigningService<FsArtifactStore, JsonlAuditLog> {
    /// Service over the directories and log file named in the config
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        let store = FsArtifactStore::open(&config.storage_root)?;
        let log = JsonlAuditLog::open(&config.audit_log)?;
        Ok(Self::new(config, store, log))
    }
}

impl SigningService<MemoryArtifactStore, MemoryAuditLog> {
    pub fn in_memory(config: ServiceConfig) -> Self {
        Self::new(config, MemoryArtifactStore::new(), MemoryAuditLog::new())
    }
}

impl<St: ArtifactStore, Si: AuditSink> SigningService<St, Si> {
    pub fn new(config: ServiceConfig, store: St, sink: Si) -> Self {
        Self {
            config,
            store,
            recorder: HashChainRecorder::new(sink),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Store an original document under its artifact id
    ///
    /// The bytes must decode as a PDF. Uploading the same bytes twice yields
    /// the same id.
    pub fn upload(&mut self, bytes: &[u8], file_name: Option<&str>) -> Result<UploadResponse> {
        if bytes.is_empty() {
            return Err(ServiceError::Validation(MSG_UPLOAD_MISSING.to_string()));
        }
        PdfDocument::open_from_bytes(bytes).map_err(BurnError::from)?;

        let pdf_id = artifact_id(bytes);
        let hash = content_hash(bytes);
        self.store.put(&original_key(&pdf_id), bytes)?;

        tracing::info!(artifact = %pdf_id, hash = %hash, size = bytes.len(), "stored original");

        Ok(UploadResponse {
            pdf_id,
            hash,
            file_name: file_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(self.config.default_file_name.as_str())
                .to_string(),
        })
    }

    /// The stored original of an artifact
    pub fn original(&self, pdf_id: &str) -> Result<Vec<u8>> {
        self.store
            .get(&original_key(pdf_id))?
            .ok_or_else(|| ServiceError::NotFound(format!("PDF not found with ID: {pdf_id}")))
    }

    /// A stored burn output by file name
    pub fn signed(&self, name: &str) -> Result<Vec<u8>> {
        let key = format!("{}/{}", self.config.signed_namespace, name);
        self.store
            .get(&key)?
            .ok_or_else(|| ServiceError::NotFound(format!("Signed PDF not found: {name}")))
    }

    /// Burn a signature into the stored original of `pdf_id`
    ///
    /// `coordinates` are PDF points with a bottom-left origin.
    pub fn sign(
        &mut self,
        pdf_id: &str,
        signature_image: &str,
        coordinates: &Coordinates,
    ) -> Result<SignedArtifact> {
        let original = self.original(pdf_id)?;
        self.sign_bytes(pdf_id, &original, signature_image, coordinates)
    }

    /// Burn a signature into `input` and record it under `pdf_id`
    pub fn sign_bytes(
        &mut self,
        pdf_id: &str,
        input: &[u8],
        signature_image: &str,
        coordinates: &Coordinates,
    ) -> Result<SignedArtifact> {
        let image = decode_image_payload(signature_image)?;
        let output = burn_one(input, coordinates, &image, &self.config.burn)?;
        self.commit(pdf_id, input, output)
    }

    /// Burn a list of percentage-placed fields into `input` and record it under `pdf_id`
    pub fn burn_fields(&mut self, pdf_id: &str, input: &[u8], fields: &[Field]) -> Result<SignedArtifact> {
        let output = burn(input, fields, &self.config.burn)?;
        self.commit(pdf_id, input, output)
    }

    fn commit(&mut self, pdf_id: &str, input: &[u8], output: BurnOutput) -> Result<SignedArtifact> {
        let original_hash = content_hash(input);
        let name = self.unused_signed_name(pdf_id)?;
        let key = format!("{}/{}", self.config.signed_namespace, name);
        self.store.put(&key, &output.bytes)?;

        let location = self.config.public_location(&name);
        let entry = match self
            .recorder
            .record(pdf_id, &original_hash, &output.hash, &location)
        {
            Ok(entry) => entry,
            Err(err) => {
                // an unaudited signed file must not stay behind
                if let Err(cleanup) = self.store.remove(&key) {
                    tracing::error!(key = %key, error = %cleanup, "failed to remove unrecorded artifact");
                }
                return Err(err.into());
            }
        };

        tracing::info!(
            artifact = %pdf_id,
            original_hash = %original_hash,
            signed_hash = %output.hash,
            location = %location,
            "stored signed document"
        );

        Ok(SignedArtifact {
            response: SignResponse {
                signed_pdf_url: location,
                original_hash,
                signed_hash: output.hash,
                audit_trail_id: entry.id,
            },
            bytes: output.bytes,
        })
    }

    /// `{id}_signed_{unixMillis}.pdf`, moved forward past names already taken
    fn unused_signed_name(&self, pdf_id: &str) -> Result<String> {
        let mut millis = chrono::Utc::now().timestamp_millis();
        loop {
            let name = format!("{pdf_id}_signed_{millis}.pdf");
            let key = format!("{}/{}", self.config.signed_namespace, name);
            if !self.store.contains(&key)? {
                return Ok(name);
            }
            millis += 1;
        }
    }

    /// Audit history of an artifact
    pub fn history(&self, pdf_id: &str) -> Result<HistoryResponse> {
        let entries = self.recorder.history(pdf_id)?;
        if entries.is_empty() && !self.store.contains(&original_key(pdf_id))? {
            return Err(ServiceError::NotFound(format!("PDF not found with ID: {pdf_id}")));
        }

        let chain_intact = verify_chain(&entries).is_intact();
        Ok(HistoryResponse {
            pdf_id: pdf_id.to_string(),
            entries,
            chain_intact,
        })
    }

    /// Upload request to response envelope
    pub fn handle_upload(&mut self, request: &UploadRequest) -> ApiResponse<UploadResponse> {
        let result = request
            .pdf_data
            .as_deref()
            .filter(|data| !data.trim().is_empty())
            .ok_or_else(|| ServiceError::Validation(MSG_UPLOAD_MISSING.to_string()))
            .and_then(|data| {
                STANDARD
                    .decode(data.trim())
                    .map_err(|e| ServiceError::Validation(format!("Invalid pdfData: {e}")))
            })
            .and_then(|bytes| self.upload(&bytes, request.file_name.as_deref()));

        respond(result, "PDF uploaded successfully", "uploading PDF")
    }

    /// Sign request to response envelope
    pub fn handle_sign(&mut self, request: &SignRequest) -> ApiResponse<SignResponse> {
        let result = validate_sign(request).and_then(|(pdf_id, image, coordinates)| {
            self.sign(pdf_id, image, &coordinates)
                .map(|signed| signed.response)
        });

        respond(result, "PDF signed successfully", "signing PDF")
    }

    /// History lookup to response envelope
    pub fn handle_history(&self, pdf_id: &str) -> ApiResponse<HistoryResponse> {
        respond(
            self.history(pdf_id),
            "Audit trail retrieved successfully",
            "reading audit trail",
        )
    }
}

fn original_key(pdf_id: &str) -> String {
    format!("{pdf_id}.pdf")
}

fn validate_sign(request: &SignRequest) -> Result<(&str, &str, Coordinates)> {
    let (Some(pdf_id), Some(image), Some(coordinates)) = (
        request.pdf_id.as_deref().filter(|v| !v.is_empty()),
        request.signature_image.as_deref().filter(|v| !v.is_empty()),
        request.coordinates.as_ref(),
    ) else {
        return Err(ServiceError::Validation(MSG_SIGN_MISSING.to_string()));
    };

    let coordinates = coordinates
        .resolved()
        .ok_or_else(|| ServiceError::Validation(MSG_COORDINATES_MISSING.to_string()))?;

    Ok((pdf_id, image, coordinates))
}

fn respond<T>(result: Result<T>, success: &str, operation: &str) -> ApiResponse<T> {
    match result {
        Ok(data) => ApiResponse::ok(success, data),
        Err(err) if err.is_client_error() => {
            tracing::warn!(error = %err, status = err.status(), "rejected request");
            let message = match &err {
                ServiceError::Burn(BurnError::UnsupportedImageFormat { .. }) => {
                    MSG_INVALID_IMAGE.to_string()
                }
                other => other.to_string(),
            };
            ApiResponse::fail(err.status(), message)
        }
        Err(err) => {
            tracing::error!(error = %err, "request failed while {operation}");
            ApiResponse::internal(format!("Internal server error while {operation}"), err.to_string())
        }
    }
}
