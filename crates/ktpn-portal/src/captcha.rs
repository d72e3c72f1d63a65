//! CAPTCHA retrieval and OCR-based solving.

use crate::error::{PortalError, Result};
use crate::session::Session;
use async_trait::async_trait;
use ktpn_core::OcrConfig;
use std::io::Write;

/// OCR engine trait for pluggable implementations.
///
/// Given image bytes, return the recognized text.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text in an encoded image.
    async fn recognize(&self, image: &[u8]) -> Result<String>;
}

/// Tesseract-backed recognizer.
///
/// Each call decodes the image, stages it in a temporary file and runs the
/// `tesseract` binary on a blocking thread. Nothing outlives the call.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    config: OcrConfig,
}

impl TesseractRecognizer {
    /// Create a recognizer with the given OCR settings.
    #[must_use]
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    fn args(&self) -> rusty_tesseract::Args {
        rusty_tesseract::Args {
            lang: self.config.language.clone(),
            psm: Some(self.config.page_segmentation_mode),
            ..rusty_tesseract::Args::default()
        }
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, image: &[u8]) -> Result<String> {
        let format = image::guess_format(image)
            .map_err(|e| PortalError::decode("CAPTCHA image", e.to_string()))?;
        image::load_from_memory_with_format(image, format)
            .map_err(|e| PortalError::decode("CAPTCHA image", e.to_string()))?;

        let extension = format.extensions_str().first().copied().unwrap_or("jpg");
        let bytes = image.to_vec();
        let args = self.args();

        tokio::task::spawn_blocking(move || {
            let mut staged = tempfile::Builder::new()
                .prefix("ktpn-captcha-")
                .suffix(&format!(".{extension}"))
                .tempfile()
                .map_err(PortalError::ocr)?;
            staged.write_all(&bytes).map_err(PortalError::ocr)?;
            staged.flush().map_err(PortalError::ocr)?;

            let input =
                rusty_tesseract::Image::from_path(staged.path()).map_err(PortalError::ocr)?;
            rusty_tesseract::image_to_string(&input, &args).map_err(PortalError::ocr)
        })
        .await
        .map_err(PortalError::ocr)?
    }
}

/// Fetches CAPTCHA images through a session and hands them to an OCR engine.
pub struct CaptchaSolver<'a> {
    captcha_url: &'a str,
    recognizer: &'a dyn TextRecognizer,
}

impl<'a> CaptchaSolver<'a> {
    /// Create a solver for the given CAPTCHA endpoint.
    #[must_use]
    pub fn new(captcha_url: &'a str, recognizer: &'a dyn TextRecognizer) -> Self {
        Self {
            captcha_url,
            recognizer,
        }
    }

    /// Fetch a fresh CAPTCHA over `session` and return the recognized text.
    ///
    /// The text is returned exactly as the OCR engine produced it. There is no
    /// retry here; a misread surfaces later as a rejected submission.
    pub async fn solve(&self, session: &Session) -> Result<String> {
        let image = session.get_bytes(self.captcha_url).await?;
        tracing::debug!("Fetched CAPTCHA image ({} bytes)", image.len());

        let text = self.recognizer.recognize(&image).await?;
        tracing::debug!("OCR read CAPTCHA as {:?}", text);
        Ok(text)
    }
}
