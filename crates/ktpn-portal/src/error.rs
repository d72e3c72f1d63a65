//! Error types for the lookup pipeline.

use thiserror::Error;

/// Errors that can occur during a single lookup attempt.
#[derive(Debug, Error)]
pub enum PortalError {
    /// The HTTP client or its cookie store could not be built
    #[error("failed to create HTTP session: {0}")]
    SessionInit(#[source] reqwest::Error),

    /// Network or connection failure
    #[error("request to {url} failed: {source}")]
    Transport {
        /// Requested URL
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The portal answered with something other than 200 OK
    #[error("unexpected status from {url}: HTTP {status}")]
    UnexpectedStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Malformed image, JSON or HTML where a well-formed one was required
    #[error("failed to decode {what}: {reason}")]
    Decode {
        /// What was being decoded
        what: &'static str,
        /// Why decoding failed
        reason: String,
    },

    /// The portal refused the lookup, usually because the CAPTCHA was misread
    #[error("lookup rejected by portal: {body}")]
    SubmissionRejected {
        /// Raw acknowledgment body
        body: String,
    },

    /// The OCR engine failed
    #[error("OCR failed: {source}")]
    Ocr {
        /// Error reported by the OCR engine
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl PortalError {
    pub(crate) fn decode(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Decode {
            what,
            reason: reason.into(),
        }
    }

    pub(crate) fn ocr(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Ocr {
            source: source.into(),
        }
    }
}

/// Result type for lookup operations.
pub type Result<T> = std::result::Result<T, PortalError>;
