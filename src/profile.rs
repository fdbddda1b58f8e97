/// Profile persistence: a grid format plus all 24 button configs,
/// stored as a flat pretty-printed JSON file.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::button::{ButtonConfig, GridFormat, MAX_BUTTONS};

/// Errors from loading or saving a profile file
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Could not read profile: {0}")]
    Read(#[source] std::io::Error),

    #[error("Could not write profile: {0}")]
    Write(#[source] std::io::Error),

    #[error("Profile is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk profile format
///
/// `grid_format` is stored as its human label so the file stays readable
/// and old files with unknown labels still load (fall back to 6x4).
#[derive(Debug, Serialize, Deserialize)]
struct ProfileFile {
    grid_format: String,
    buttons: Vec<ButtonConfig>,
}

/// A complete button layout
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub grid: GridFormat,
    pub buttons: Vec<ButtonConfig>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            grid: GridFormat::default(),
            buttons: crate::button::default_buttons(),
        }
    }
}

impl Profile {
    /// Load a profile from disk
    ///
    /// Tolerant on shape: short button lists are padded with empty slots
    /// up to 24, long ones truncated, ids renumbered to their slot index.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let raw = fs::read_to_string(path).map_err(ProfileError::Read)?;
        let file: ProfileFile = serde_json::from_str(&raw)?;

        let mut buttons = file.buttons;
        buttons.truncate(MAX_BUTTONS);
        while buttons.len() < MAX_BUTTONS {
            buttons.push(ButtonConfig::empty(buttons.len()));
        }
        // Ids are positional; fix up whatever the file claimed
        for (i, b) in buttons.iter_mut().enumerate() {
            b.id = i;
        }

        Ok(Self {
            grid: GridFormat::from_label(&file.grid_format),
            buttons,
        })
    }

    /// Save this profile to disk
    pub fn save(&self, path: &Path) -> Result<(), ProfileError> {
        let file = ProfileFile {
            grid_format: self.grid.label().to_string(),
            buttons: self.buttons.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(path, json).map_err(ProfileError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ColorName;
    use std::path::PathBuf;

    fn temp_profile_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("test-profile.json")
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_profile_path(&dir);

        let mut profile = Profile::default();
        profile.grid = GridFormat::Grid6x2;
        profile.buttons[3].name = "Airhorn".to_string();
        profile.buttons[3].sound = Some(PathBuf::from("clips/airhorn.wav"));
        profile.buttons[3].color = ColorName::Red;
        profile.buttons[3].hotkey = Some("f5".to_string());

        profile.save(&path).unwrap();
        let loaded = Profile::load(&path).unwrap();

        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_load_pads_short_button_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_profile_path(&dir);

        // Hand-written file with only two buttons
        let raw = r#"{
            "grid_format": "6x1 (6 buttons)",
            "buttons": [
                {"id": 0, "name": "One"},
                {"id": 0, "name": "Two"}
            ]
        }"#;
        std::fs::write(&path, raw).unwrap();

        let loaded = Profile::load(&path).unwrap();
        assert_eq!(loaded.grid, GridFormat::Grid6x1);
        assert_eq!(loaded.buttons.len(), MAX_BUTTONS);
        assert_eq!(loaded.buttons[0].name, "One");
        assert_eq!(loaded.buttons[1].name, "Two");
        assert!(loaded.buttons[2].is_empty());
        // Ids renumbered positionally even though the file lied
        assert_eq!(loaded.buttons[1].id, 1);
        assert_eq!(loaded.buttons[23].id, 23);
    }

    #[test]
    fn test_load_truncates_long_button_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_profile_path(&dir);

        let mut profile = Profile::default();
        profile.buttons.push(ButtonConfig::empty(24));
        profile.buttons.push(ButtonConfig::empty(25));
        profile.save(&path).unwrap();

        let loaded = Profile::load(&path).unwrap();
        assert_eq!(loaded.buttons.len(), MAX_BUTTONS);
    }

    #[test]
    fn test_unknown_grid_label_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_profile_path(&dir);

        let raw = r#"{"grid_format": "11x3 (weird)", "buttons": []}"#;
        std::fs::write(&path, raw).unwrap();

        let loaded = Profile::load(&path).unwrap();
        assert_eq!(loaded.grid, GridFormat::Grid6x4);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_profile_path(&dir);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Profile::load(&path), Err(ProfileError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_profile_path(&dir);
        assert!(matches!(Profile::load(&path), Err(ProfileError::Read(_))));
    }
}
