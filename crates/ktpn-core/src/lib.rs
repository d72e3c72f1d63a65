//! ktpn Core - Foundation crate for the ktpn violation lookup tool.
//!
//! This crate provides the shared request types, error handling and
//! configuration management that the portal pipeline and the CLI depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Request newtypes and enums (`PlateNumber`, `VehicleType`, `LookupRequest`)
//!
//! # Example
//!
//! ```rust
//! use ktpn_core::{AppConfig, LookupRequest, VehicleType};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.lookup.max_attempts, 5);
//!
//! let request = LookupRequest::new("29a-123.45", VehicleType::Car);
//! assert_eq!(request.plate.as_str(), "29A12345");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, HttpConfig, LookupConfig, OcrConfig, PortalConfig};
pub use error::{ConfigError, ConfigResult, KtpnError};
pub use types::{LookupRequest, PlateNumber, VehicleType};
