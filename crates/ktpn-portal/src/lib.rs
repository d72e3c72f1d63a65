//! ktpn Portal - Traffic violation lookup pipeline.
//!
//! This crate looks up road-traffic violations for a plate number against
//! a CAPTCHA-gated government portal. A single attempt runs the whole
//! pipeline sequentially over one cookie-bearing session:
//!
//! 1. Fetch the CAPTCHA image and read it with OCR
//! 2. Wait a fixed courtesy delay, then submit the lookup form
//! 3. Validate the acknowledgment and fetch the result page it points to
//! 4. Walk the result page and extract violation records
//!
//! OCR misreads are routine, so callers wrap attempts in [`retry`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ktpn_core::{AppConfig, VehicleType};
//! use ktpn_portal::{retry, Portal};
//!
//! let config = AppConfig::load_with_env(None)?;
//! let portal = Portal::new(&config);
//!
//! let violations = retry(config.lookup.max_attempts, || {
//!     portal.lookup("29A-123.45", VehicleType::Car)
//! })
//! .await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod captcha;
pub mod error;
pub mod parser;
pub mod portal;
pub mod retry;
pub mod session;
pub mod submit;
pub mod violation;

// Re-export commonly used types
pub use captcha::{CaptchaSolver, TesseractRecognizer, TextRecognizer};
pub use error::{PortalError, Result};
pub use parser::{extract_violations, ViolationParser};
pub use portal::Portal;
pub use retry::retry;
pub use session::Session;
pub use submit::{LookupSubmitter, SubmissionAck, SUBMIT_DELAY};
pub use violation::Violation;
