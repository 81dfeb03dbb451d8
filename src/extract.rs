//! Document field-extraction capability
//!
//! The actual extraction backend (an external AI service) lives outside this
//! crate; upload flows only see [`ExtractionService`], an injected capability
//! object with an explicit initialization state machine. Extraction is
//! best-effort everywhere: a missing or failing backend degrades to "no
//! fields extracted", never to an upload error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::entities::document::DocumentType;

/// Fields an extractor may recover from an uploaded document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vessel_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<DateTime<Utc>>,
    /// Declared CAF value in GNF, for duty estimation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caf_value: Option<i64>,
}

impl ExtractedFields {
    pub fn is_empty(&self) -> bool {
        self.tracking_number.is_none()
            && self.vessel_name.is_none()
            && self.container_number.is_none()
            && self.eta.is_none()
            && self.caf_value.is_none()
    }
}

/// Backend contract for field extraction.
pub trait FieldExtractor: Send + Sync {
    /// Cheap connectivity/credentials check, called once at startup.
    fn probe(&self) -> Result<(), String>;

    /// Extract fields from raw document bytes.
    fn extract(&self, doc_type: DocumentType, bytes: &[u8]) -> Result<ExtractedFields, String>;
}

/// Initialization state of the extraction backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorState {
    Uninitialized,
    Probing,
    Ready,
    Unavailable,
}

/// Capability object wrapping a [`FieldExtractor`].
///
/// Constructed once at process start and injected into upload flows; there
/// is no ambient global. `init` drives Uninitialized -> Probing -> Ready or
/// Unavailable; an Unavailable service short-circuits every extract call.
pub struct ExtractionService {
    backend: Option<Box<dyn FieldExtractor>>,
    state: ExtractorState,
}

impl ExtractionService {
    pub fn new(backend: Box<dyn FieldExtractor>) -> Self {
        Self {
            backend: Some(backend),
            state: ExtractorState::Uninitialized,
        }
    }

    /// A service with no backend configured; always Unavailable.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            state: ExtractorState::Unavailable,
        }
    }

    pub fn state(&self) -> ExtractorState {
        self.state
    }

    /// Probe the backend once. Idempotent: re-running after the state has
    /// settled is a no-op.
    pub fn init(&mut self) -> ExtractorState {
        if self.state != ExtractorState::Uninitialized {
            return self.state;
        }
        let Some(backend) = &self.backend else {
            self.state = ExtractorState::Unavailable;
            return self.state;
        };
        self.state = ExtractorState::Probing;
        match backend.probe() {
            Ok(()) => {
                info!("field extraction backend ready");
                self.state = ExtractorState::Ready;
            }
            Err(e) => {
                warn!(error = %e, "field extraction backend unavailable, uploads continue without auto-fill");
                self.state = ExtractorState::Unavailable;
            }
        }
        self.state
    }

    /// Best-effort extraction: `None` when the backend is unavailable or the
    /// call fails. Never an error - the upload has already succeeded.
    pub fn try_extract(&self, doc_type: DocumentType, bytes: &[u8]) -> Option<ExtractedFields> {
        if self.state != ExtractorState::Ready {
            return None;
        }
        let backend = self.backend.as_ref()?;
        match backend.extract(doc_type, bytes) {
            Ok(fields) if fields.is_empty() => None,
            Ok(fields) => Some(fields),
            Err(e) => {
                warn!(doc_type = %doc_type, error = %e, "field extraction failed, continuing without auto-fill");
                None
            }
        }
    }
}
