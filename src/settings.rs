/// App-level settings, persisted on exit and loaded on startup
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::button::GridFormat;
use crate::storage;

fn default_volume() -> f32 {
    0.8
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Master playback volume (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub master_volume: f32,

    /// Last selected grid layout
    #[serde(default)]
    pub grid_format: GridFormat,

    /// Profile reopened on launch, when it still exists
    #[serde(default)]
    pub last_profile: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            master_volume: default_volume(),
            grid_format: GridFormat::default(),
            last_profile: None,
        }
    }
}

impl AppSettings {
    /// Load settings from the platform config dir
    /// Missing or unreadable settings fall back to defaults silently
    pub fn load() -> Self {
        let path = storage::settings_path();
        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<AppSettings>(&raw) {
                Ok(mut settings) => {
                    settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
                    settings
                }
                Err(e) => {
                    warn!("[Settings] Ignoring malformed {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                debug!("[Settings] No saved settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Persist settings; failures are logged, never fatal
    pub fn save(&self) {
        let path = storage::settings_path();
        let json = match serde_json::to_string_pretty(self) {
            Ok(j) => j,
            Err(e) => {
                warn!("[Settings] Failed to serialize settings: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&path, json) {
            warn!("[Settings] Failed to write {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = AppSettings::default();
        assert_eq!(s.master_volume, 0.8);
        assert_eq!(s.grid_format, GridFormat::Grid6x4);
        assert!(s.last_profile.is_none());
    }

    #[test]
    fn test_partial_settings_fill_with_defaults() {
        let s: AppSettings = serde_json::from_str(r#"{"master_volume": 0.25}"#).unwrap();
        assert_eq!(s.master_volume, 0.25);
        assert_eq!(s.grid_format, GridFormat::Grid6x4);
    }

    #[test]
    fn test_settings_round_trip() {
        let mut s = AppSettings::default();
        s.master_volume = 0.5;
        s.grid_format = GridFormat::Grid6x2;
        s.last_profile = Some(PathBuf::from("profiles/party.json"));

        let json = serde_json::to_string(&s).unwrap();
        let back: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
