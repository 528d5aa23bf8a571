//! Sequential multi-signature sessions
//!
//! A session folds burns over one document: the output of step n is the
//! input of step n+1. All steps are recorded under the artifact id of the
//! original upload, so the audit history of that id is the whole chain.

use crate::api::SignResponse;
use crate::service::SigningService;
use crate::store::ArtifactStore;
use crate::Result;
use audit_trail::AuditSink;
use field_burn::{content_hash, Coordinates, Field};

/// Final state of a session
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub artifact_id: String,
    pub original_hash: String,
    pub final_hash: String,
    pub final_bytes: Vec<u8>,
    pub steps: Vec<SignResponse>,
}

/// A running multi-signature session
pub struct SigningSession<'a, St, Si> {
    service: &'a mut SigningService<St, Si>,
    artifact_id: String,
    original_hash: String,
    current: Vec<u8>,
    current_hash: String,
    steps: Vec<SignResponse>,
}

impl<'a, St: ArtifactStore, Si: AuditSink> SigningSession<'a, St, Si> {
    /// Upload `document` and start a session on it
    pub fn start(
        service: &'a mut SigningService<St, Si>,
        document: &[u8],
        file_name: Option<&str>,
    ) -> Result<Self> {
        let upload = service.upload(document, file_name)?;
        Ok(Self {
            service,
            artifact_id: upload.pdf_id,
            original_hash: upload.hash.clone(),
            current: document.to_vec(),
            current_hash: upload.hash,
            steps: Vec::new(),
        })
    }

    /// Resume from an already stored original
    pub fn resume(service: &'a mut SigningService<St, Si>, artifact_id: &str) -> Result<Self> {
        let original = service.original(artifact_id)?;
        let hash = content_hash(&original);
        Ok(Self {
            service,
            artifact_id: artifact_id.to_string(),
            original_hash: hash.clone(),
            current: original,
            current_hash: hash,
            steps: Vec::new(),
        })
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    /// Hash of the last committed state
    ///
    /// After a failed step this is still the hash of the last good output,
    /// which is where the session continues from.
    pub fn current_hash(&self) -> &str {
        &self.current_hash
    }

    pub fn current_bytes(&self) -> &[u8] {
        &self.current
    }

    pub fn steps(&self) -> &[SignResponse] {
        &self.steps
    }

    /// Burn one signature into the current state
    pub fn sign(&mut self, signature_image: &str, coordinates: &Coordinates) -> Result<&SignResponse> {
        let signed = self.service.sign_bytes(
            &self.artifact_id,
            &self.current,
            signature_image,
            coordinates,
        )?;
        Ok(self.advance(signed.bytes, signed.response))
    }

    /// Burn percentage-placed fields into the current state
    pub fn burn_fields(&mut self, fields: &[Field]) -> Result<&SignResponse> {
        let signed = self
            .service
            .burn_fields(&self.artifact_id, &self.current, fields)?;
        Ok(self.advance(signed.bytes, signed.response))
    }

    fn advance(&mut self, bytes: Vec<u8>, response: SignResponse) -> &SignResponse {
        tracing::debug!(
            artifact = %self.artifact_id,
            step = self.steps.len() + 1,
            from = %self.current_hash,
            to = %response.signed_hash,
            "session advanced"
        );
        self.current = bytes;
        self.current_hash = response.signed_hash.clone();
        self.steps.push(response);
        &self.steps[self.steps.len() - 1]
    }

    pub fn finish(self) -> SessionSummary {
        SessionSummary {
            artifact_id: self.artifact_id,
            original_hash: self.original_hash,
            final_hash: self.current_hash,
            final_bytes: self.current,
            steps: self.steps,
        }
    }
}
