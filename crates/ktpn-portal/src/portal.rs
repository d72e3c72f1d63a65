//! The lookup pipeline.
//!
//! One call to [`Portal::lookup`] is one attempt: a fresh session, a fresh
//! CAPTCHA, one submission and one result page. Retrying is left to the
//! caller (see [`crate::retry`]).

use crate::captcha::{CaptchaSolver, TesseractRecognizer, TextRecognizer};
use crate::error::Result;
use crate::parser::ViolationParser;
use crate::session::Session;
use crate::submit::LookupSubmitter;
use crate::violation::Violation;
use ktpn_core::{AppConfig, HttpConfig, LookupRequest, PortalConfig, VehicleType};
use std::sync::Arc;

/// Entry point for violation lookups against the portal.
pub struct Portal {
    portal: PortalConfig,
    http: HttpConfig,
    recognizer: Arc<dyn TextRecognizer>,
}

impl Portal {
    /// Create a portal client using Tesseract for CAPTCHA recognition.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_recognizer(
            config,
            Arc::new(TesseractRecognizer::new(config.ocr.clone())),
        )
    }

    /// Create a portal client with a custom OCR engine.
    #[must_use]
    pub fn with_recognizer(config: &AppConfig, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            portal: config.portal.clone(),
            http: config.http.clone(),
            recognizer,
        }
    }

    /// Run a single lookup attempt for a plate.
    ///
    /// The plate is normalized before submission. An empty list means the
    /// portal has no violations on record.
    pub async fn lookup(
        &self,
        plate_number: &str,
        vehicle_type: VehicleType,
    ) -> Result<Vec<Violation>> {
        self.lookup_request(&LookupRequest::new(plate_number, vehicle_type))
            .await
    }

    /// Run a single lookup attempt for a prepared request.
    pub async fn lookup_request(&self, request: &LookupRequest) -> Result<Vec<Violation>> {
        let session = Session::create(&self.http)?;

        let captcha = CaptchaSolver::new(&self.portal.captcha_url, self.recognizer.as_ref())
            .solve(&session)
            .await?;

        let submitter = LookupSubmitter::new(&self.portal);
        let ack = submitter.submit(&session, request, &captcha).await?;
        let result_url = submitter.result_url(&ack)?;

        let page = session.get_bytes(result_url.as_str()).await?;
        let violations = ViolationParser::new()?.parse(&page)?;

        tracing::info!(
            "Found {} violation(s) for {}",
            violations.len(),
            request.plate
        );
        Ok(violations)
    }
}
