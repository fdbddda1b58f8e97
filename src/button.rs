/// Button configuration model
///
/// A profile always carries MAX_BUTTONS configs; the grid format only
/// decides how many of them are visible (and may have active hotkeys).
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::palette::{ColorName, EMPTY_EMOJI};

/// Total button slots in a profile, independent of the visible grid
pub const MAX_BUTTONS: usize = 24;

/// Name shown on slots that have nothing assigned yet
pub const EMPTY_NAME: &str = "Empty";

/// Configuration of a single soundboard button
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ButtonConfig {
    /// Slot index (0..MAX_BUTTONS); stable across grid format changes
    pub id: usize,

    /// Emoji glyph shown on the button
    #[serde(default = "default_emoji")]
    pub emoji: String,

    /// Short display name
    #[serde(default = "default_name")]
    pub name: String,

    /// Sound file; relative paths resolve against the app data dir
    #[serde(default)]
    pub sound: Option<PathBuf>,

    /// Background color (palette name)
    #[serde(default)]
    pub color: ColorName,

    /// Canonical key name ("a", "f5", "space", ...) or None
    #[serde(default)]
    pub hotkey: Option<String>,
}

fn default_emoji() -> String {
    EMPTY_EMOJI.to_string()
}

fn default_name() -> String {
    EMPTY_NAME.to_string()
}

impl ButtonConfig {
    /// A fresh, unassigned slot
    pub fn empty(id: usize) -> Self {
        Self {
            id,
            emoji: default_emoji(),
            name: default_name(),
            sound: None,
            color: ColorName::Empty,
            hotkey: None,
        }
    }

    /// True when nothing has been assigned to this slot
    /// (recordings land on the first button where this holds)
    pub fn is_empty(&self) -> bool {
        self.sound.is_none() && self.name == EMPTY_NAME
    }
}

/// Build the full 24-slot default layout
pub fn default_buttons() -> Vec<ButtonConfig> {
    (0..MAX_BUTTONS).map(ButtonConfig::empty).collect()
}

/// Find the first unassigned slot, if any
pub fn first_empty_slot(buttons: &[ButtonConfig]) -> Option<usize> {
    buttons.iter().position(|b| b.is_empty())
}

/// Supported grid layouts (columns x rows)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridFormat {
    Grid6x1,
    Grid6x2,
    Grid6x3,
    Grid6x4,
}

impl Default for GridFormat {
    fn default() -> Self {
        GridFormat::Grid6x4
    }
}

impl GridFormat {
    pub fn columns(&self) -> usize {
        6
    }

    pub fn rows(&self) -> usize {
        match self {
            GridFormat::Grid6x1 => 1,
            GridFormat::Grid6x2 => 2,
            GridFormat::Grid6x3 => 3,
            GridFormat::Grid6x4 => 4,
        }
    }

    /// Number of visible buttons in this layout
    pub fn capacity(&self) -> usize {
        self.columns() * self.rows()
    }

    /// Human label, also the value stored in profile files
    pub fn label(&self) -> &'static str {
        match self {
            GridFormat::Grid6x1 => "6x1 (6 buttons)",
            GridFormat::Grid6x2 => "6x2 (12 buttons)",
            GridFormat::Grid6x3 => "6x3 (18 buttons)",
            GridFormat::Grid6x4 => "6x4 (24 buttons)",
        }
    }

    /// Parse a stored label; unknown labels fall back to the full grid
    pub fn from_label(label: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.label() == label)
            .unwrap_or_default()
    }

    pub fn all() -> &'static [GridFormat] {
        &[
            GridFormat::Grid6x1,
            GridFormat::Grid6x2,
            GridFormat::Grid6x3,
            GridFormat::Grid6x4,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot_defaults() {
        let b = ButtonConfig::empty(7);
        assert_eq!(b.id, 7);
        assert_eq!(b.emoji, EMPTY_EMOJI);
        assert_eq!(b.name, EMPTY_NAME);
        assert!(b.sound.is_none());
        assert!(b.hotkey.is_none());
        assert!(b.is_empty());
    }

    #[test]
    fn test_is_empty_cleared_by_assignment() {
        let mut b = ButtonConfig::empty(0);
        b.sound = Some(PathBuf::from("clips/horn.wav"));
        assert!(!b.is_empty());

        // A renamed slot counts as used even with no file, so a recording
        // never overwrites it
        let mut c = ButtonConfig::empty(1);
        c.name = "Airhorn".to_string();
        assert!(!c.is_empty());
    }

    #[test]
    fn test_first_empty_slot() {
        let mut buttons = default_buttons();
        assert_eq!(first_empty_slot(&buttons), Some(0));

        buttons[0].sound = Some(PathBuf::from("a.wav"));
        buttons[1].name = "Used".to_string();
        assert_eq!(first_empty_slot(&buttons), Some(2));

        for b in buttons.iter_mut() {
            b.name = "Used".to_string();
        }
        assert_eq!(first_empty_slot(&buttons), None);
    }

    #[test]
    fn test_grid_capacities() {
        assert_eq!(GridFormat::Grid6x1.capacity(), 6);
        assert_eq!(GridFormat::Grid6x2.capacity(), 12);
        assert_eq!(GridFormat::Grid6x3.capacity(), 18);
        assert_eq!(GridFormat::Grid6x4.capacity(), 24);
        // Full grid covers every slot
        assert_eq!(GridFormat::Grid6x4.capacity(), MAX_BUTTONS);
    }

    #[test]
    fn test_grid_label_round_trip() {
        for fmt in GridFormat::all() {
            assert_eq!(GridFormat::from_label(fmt.label()), *fmt);
        }
    }

    #[test]
    fn test_unknown_label_falls_back_to_full_grid() {
        assert_eq!(GridFormat::from_label("9x9 (huge)"), GridFormat::Grid6x4);
        assert_eq!(GridFormat::from_label(""), GridFormat::Grid6x4);
    }

    #[test]
    fn test_button_config_serde_defaults() {
        // Old profile files may carry only id; everything else defaults
        let b: ButtonConfig = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(b.id, 3);
        assert!(b.is_empty());
        assert_eq!(b.color, ColorName::Empty);
    }
}
