//! Error types shared across the overlay.
//!
//! None of these are fatal. Callers either show them to the user as an
//! inline message or placeholder, or log them and carry on.

use std::path::PathBuf;
use thiserror::Error;

/// The requested map id is not present in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("map `{id}` is not in the catalog")]
pub struct UnknownMapError {
    pub id: String,
}

/// A map tile image could not be found or decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load map image {}: {reason}", path.display())]
pub struct AssetLoadError {
    /// Path that was attempted.
    pub path: PathBuf,
    pub reason: String,
}

impl AssetLoadError {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// The OS process list could not be read during a single sample.
#[derive(Debug, Clone, Error)]
#[error("process enumeration failed: {0}")]
pub struct ProcessEnumerationError(pub String);

/// Settings could not be read or written.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A hotkey string could not be parsed or registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotkeyError {
    #[error("empty hotkey accelerator")]
    Empty,
    #[error("unknown key `{0}` in hotkey accelerator")]
    UnknownKey(String),
    #[error("hotkey accelerator `{0}` has no non-modifier key")]
    MissingKey(String),
    #[error("failed to register hotkey `{accelerator}`: {reason}")]
    Registration { accelerator: String, reason: String },
}
