//! Runtime configuration for the training and inference flows.
//!
//! Values come from `crate::constants` getters (environment with fallback).
//! Remote-store credentials have no fallback and are validated up front.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::constants;

/// Fragments that mark an unedited credential template
const PLACEHOLDER_MARKERS: &[&str] = &["replace with", "your-project", "your_", "changeme", "<"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{0} still holds a placeholder value")]
    Placeholder(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Serial link settings
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    pub timeout: Duration,
}

impl SerialConfig {
    pub fn from_env() -> Self {
        Self {
            port: constants::get_serial_port(),
            baud_rate: constants::get_baud_rate(),
            timeout: constants::SERIAL_READ_TIMEOUT,
        }
    }
}

/// Remote table settings
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub url: String,
    pub key: String,
    pub table: String,
    pub timeout_seconds: u64,
}

impl RemoteConfig {
    /// Build and validate. Empty or template credentials are rejected here so
    /// no connection is ever attempted with them.
    pub fn new(url: &str, key: &str, table: &str, timeout_seconds: u64) -> Result<Self, ConfigError> {
        let url = validate_credential("SUPABASE_URL", url)?;
        let key = validate_credential("SUPABASE_KEY", key)?;

        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                name: "SUPABASE_URL",
                reason: format!("expected an http(s) URL, got '{}'", url),
            });
        }

        let table = table.trim();
        if table.is_empty() {
            return Err(ConfigError::Missing("GLUCOSYNC_TABLE"));
        }

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            key,
            table: table.to_string(),
            timeout_seconds,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let url = constants::get_supabase_url().ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let key = constants::get_supabase_key().ok_or(ConfigError::Missing("SUPABASE_KEY"))?;
        Self::new(&url, &key, &constants::get_table(), constants::get_http_timeout())
    }
}

fn validate_credential(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Missing(name));
    }
    let lower = value.to_lowercase();
    if PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m)) {
        return Err(ConfigError::Placeholder(name));
    }
    Ok(value.to_string())
}

/// Everything the inference binary needs at bootstrap
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub serial: SerialConfig,
    pub remote: RemoteConfig,
    pub model_path: PathBuf,
}

impl InferenceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            serial: SerialConfig::from_env(),
            remote: RemoteConfig::from_env()?,
            model_path: PathBuf::from(constants::get_model_path()),
        })
    }
}

/// Training run settings
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub test_fraction: f64,
    pub cv_folds: usize,
    pub seed: u64,
}

impl TrainingConfig {
    pub fn from_env() -> Self {
        Self {
            dataset_path: PathBuf::from(constants::get_dataset_path()),
            model_path: PathBuf::from(constants::get_model_path()),
            test_fraction: constants::TEST_FRACTION,
            cv_folds: constants::CV_FOLDS,
            seed: constants::RANDOM_SEED,
        }
    }
}
