//! Persistent user settings.
//!
//! Settings live in a small JSON file under the user's config directory
//! (`%APPDATA%/foxhole-overlay/config.json` on Windows). Every setter writes
//! the file straight away so a crash never loses a change.

use crate::error::ConfigError;
use crate::shell::WindowBounds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOTKEY: &str = "F10";

const APP_DIR: &str = "foxhole-overlay";
const CONFIG_FILE: &str = "config.json";

/// On-disk settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub hotkey: String,
    /// Id of the last selected map sector.
    pub sector: Option<String>,
    pub start_with_windows: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_window_bounds: Option<WindowBounds>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hotkey: DEFAULT_HOTKEY.to_string(),
            sector: None,
            start_with_windows: false,
            last_window_bounds: None,
        }
    }
}

/// The settings the calculator and host read and write.
pub trait SettingsStore {
    fn selected_map_id(&self) -> Option<String>;
    fn set_selected_map_id(&mut self, id: &str) -> Result<(), ConfigError>;
    fn hotkey(&self) -> String;
}

/// Settings backed by a JSON file, or by nothing at all.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    settings: Settings,
}

impl ConfigStore {
    /// Opens the settings file at the default location.
    pub fn open() -> Result<Self, ConfigError> {
        Ok(Self::open_at(Self::default_path()?))
    }

    /// Opens settings at `path`.
    ///
    /// A missing file yields defaults. An unreadable or malformed file is
    /// logged and also yields defaults; it is overwritten on the next save.
    pub fn open_at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match Self::read(&path) {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                tracing::info!(path = ?path, "No settings file yet, using defaults");
                Settings::default()
            }
            Err(e) => {
                tracing::warn!(?e, path = ?path, "Failed to read settings, using defaults");
                Settings::default()
            }
        };

        tracing::debug!(path = ?path, ?settings, "Settings loaded");
        Self {
            path: Some(path),
            settings,
        }
    }

    /// Settings that are never written anywhere.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            settings: Settings::default(),
        }
    }

    /// Returns the default settings path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    fn read(path: &Path) -> Result<Option<Settings>, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Writes the current settings to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(path, json)?;

        tracing::trace!(path = ?path, "Settings saved");
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn last_window_bounds(&self) -> Option<WindowBounds> {
        self.settings.last_window_bounds
    }

    pub fn set_last_window_bounds(&mut self, bounds: WindowBounds) -> Result<(), ConfigError> {
        self.settings.last_window_bounds = Some(bounds);
        self.save()
    }
}

impl SettingsStore for ConfigStore {
    fn selected_map_id(&self) -> Option<String> {
        self.settings.sector.clone()
    }

    fn set_selected_map_id(&mut self, id: &str) -> Result<(), ConfigError> {
        self.settings.sector = Some(id.to_string());
        self.save()
    }

    fn hotkey(&self) -> String {
        self.settings.hotkey.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("foxhole-overlay-test-{}-{name}", std::process::id()))
            .join(CONFIG_FILE)
    }

    #[test]
    fn test_defaults() {
        let store = ConfigStore::in_memory();
        assert_eq!(store.hotkey(), "F10");
        assert!(store.selected_map_id().is_none());
        assert!(!store.settings().start_with_windows);
        assert!(store.last_window_bounds().is_none());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = temp_config_path("missing");
        let store = ConfigStore::open_at(&path);
        assert_eq!(store.settings(), &Settings::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_persist_and_reload() {
        let path = temp_config_path("reload");
        {
            let mut store = ConfigStore::open_at(&path);
            store.set_selected_map_id("callahans_passage").unwrap();
            store
                .set_last_window_bounds(WindowBounds {
                    x: 10,
                    y: 20,
                    width: 800,
                    height: 600,
                })
                .unwrap();
        }

        let store = ConfigStore::open_at(&path);
        assert_eq!(store.selected_map_id().as_deref(), Some("callahans_passage"));
        assert_eq!(store.hotkey(), DEFAULT_HOTKEY);
        assert_eq!(store.last_window_bounds().map(|b| b.width), Some(800));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_saving_keeps_hand_edited_fields() {
        let path = temp_config_path("hand-edited");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"hotkey":"Ctrl+Shift+O","startWithWindows":true}"#).unwrap();

        let mut store = ConfigStore::open_at(&path);
        assert_eq!(store.hotkey(), "Ctrl+Shift+O");
        store.set_selected_map_id("origin").unwrap();

        let store = ConfigStore::open_at(&path);
        assert_eq!(store.hotkey(), "Ctrl+Shift+O");
        assert!(store.settings().start_with_windows);
        assert_eq!(store.selected_map_id().as_deref(), Some("origin"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_camel_case_document() {
        let json = r#"{"hotkey":"F9","sector":"origin","startWithWindows":true}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.hotkey, "F9");
        assert_eq!(settings.sector.as_deref(), Some("origin"));
        assert!(settings.start_with_windows);
        assert!(settings.last_window_bounds.is_none());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"sector":null}"#).unwrap();
        assert_eq!(settings.hotkey, DEFAULT_HOTKEY);
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let path = temp_config_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let store = ConfigStore::open_at(&path);
        assert_eq!(store.settings(), &Settings::default());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
