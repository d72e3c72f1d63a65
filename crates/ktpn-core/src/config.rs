//! Configuration management for ktpn.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/ktpn/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Upstream portal endpoints and fixed form values
    pub portal: PortalConfig,
    /// HTTP client settings
    pub http: HttpConfig,
    /// OCR engine settings
    pub ocr: OcrConfig,
    /// Lookup retry settings
    pub lookup: LookupConfig,
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `KTPN_CAPTCHA_URL`: Override the CAPTCHA image endpoint
    /// - `KTPN_SUBMIT_URL`: Override the lookup submission endpoint
    /// - `KTPN_MAX_ATTEMPTS`: Override the number of lookup attempts
    /// - `KTPN_OCR_LANG`: Override the OCR language
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup function.
    ///
    /// Split out from [`AppConfig::load_with_env`] so the override rules can be
    /// exercised without touching the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("KTPN_CAPTCHA_URL") {
            tracing::debug!("Override portal.captcha_url from env: {}", url);
            self.portal.captcha_url = url;
        }

        if let Some(url) = lookup("KTPN_SUBMIT_URL") {
            tracing::debug!("Override portal.submit_url from env: {}", url);
            self.portal.submit_url = url;
        }

        if let Some(val) = lookup("KTPN_MAX_ATTEMPTS") {
            match val.parse() {
                Ok(attempts) => {
                    self.lookup.max_attempts = attempts;
                    tracing::debug!("Override lookup.max_attempts from env: {}", attempts);
                }
                Err(_) => tracing::debug!("Ignoring unparseable KTPN_MAX_ATTEMPTS: {}", val),
            }
        }

        if let Some(lang) = lookup("KTPN_OCR_LANG") {
            tracing::debug!("Override ocr.language from env: {}", lang);
            self.ocr.language = lang;
        }
    }

    /// Check values that would make every lookup fail.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.portal.captcha_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "portal.captcha_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.portal.submit_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "portal.submit_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.lookup.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lookup.max_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/ktpn/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("vn", "ktpn", "ktpn").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Upstream portal endpoints and the fixed values sent with every lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// CAPTCHA image endpoint (GET)
    pub captcha_url: String,
    /// Lookup form endpoint (POST)
    pub submit_url: String,
    /// Placeholder sent in the `ipClient` form field
    pub client_ip: String,
    /// Value sent in the `cUrl` form field
    pub submit_flag: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            captcha_url: "https://www.csgt.vn/lib/captcha/captcha.class.php".to_string(),
            submit_url: "https://www.csgt.vn/?mod=contact&task=tracuu_post&ajax".to_string(),
            client_ip: "9.9.9.91".to_string(),
            submit_flag: "1".to_string(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds (0, the default, leaves requests without a client-side deadline)
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 0,
            user_agent: concat!("ktpn/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// OCR engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language code
    pub language: String,
    /// Tesseract page segmentation mode
    pub page_segmentation_mode: i32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            // single line of text
            page_segmentation_mode: 7,
        }
    }
}

/// Lookup retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Total number of attempts, each with a fresh session and CAPTCHA
    pub max_attempts: u32,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}
