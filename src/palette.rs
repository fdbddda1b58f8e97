/// Button color palette and emoji catalog
/// The palette is fixed: buttons reference colors by name, so profiles
/// stay readable and survive theme tweaks between versions.
use egui::Color32;

use serde::{Deserialize, Serialize};

/// Cell background while its channel is audible
pub const PLAYING_COLOR: Color32 = Color32::from_rgb(119, 119, 119);

/// Named button colors
///
/// Serialized by name ("Blue", "Green", ...) so profile files stay
/// human-editable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorName {
    Blue,
    Green,
    Red,
    Orange,
    Purple,
    Teal,
    Yellow,
    Gray,
    Pink,
    /// Unassigned slot color
    #[default]
    Empty,
}

impl ColorName {
    /// Get the background color for this palette entry
    pub fn rgb(&self) -> Color32 {
        match self {
            ColorName::Blue => Color32::from_rgb(60, 141, 188),
            ColorName::Green => Color32::from_rgb(0, 166, 90),
            ColorName::Red => Color32::from_rgb(221, 75, 57),
            ColorName::Orange => Color32::from_rgb(243, 156, 18),
            ColorName::Purple => Color32::from_rgb(96, 92, 168),
            ColorName::Teal => Color32::from_rgb(0, 192, 239),
            ColorName::Yellow => Color32::from_rgb(240, 219, 46),
            ColorName::Gray => Color32::from_rgb(85, 85, 85),
            ColorName::Pink => Color32::from_rgb(216, 27, 96),
            ColorName::Empty => Color32::from_rgb(60, 60, 60),
        }
    }

    /// Human label for the color picker
    pub fn label(&self) -> &'static str {
        match self {
            ColorName::Blue => "Blue",
            ColorName::Green => "Green",
            ColorName::Red => "Red",
            ColorName::Orange => "Orange",
            ColorName::Purple => "Purple",
            ColorName::Teal => "Teal",
            ColorName::Yellow => "Yellow",
            ColorName::Gray => "Gray",
            ColorName::Pink => "Pink",
            ColorName::Empty => "Empty Slot",
        }
    }

    /// Text color that stays readable on this background
    /// (black on the bright yellow, white everywhere else)
    pub fn text_color(&self) -> Color32 {
        match self {
            ColorName::Yellow => Color32::BLACK,
            _ => Color32::WHITE,
        }
    }

    /// All palette entries, in picker order
    pub fn all() -> &'static [ColorName] {
        &[
            ColorName::Blue,
            ColorName::Green,
            ColorName::Red,
            ColorName::Orange,
            ColorName::Purple,
            ColorName::Teal,
            ColorName::Yellow,
            ColorName::Gray,
            ColorName::Pink,
            ColorName::Empty,
        ]
    }
}

/// Emoji glyphs offered by the button editor
///
/// First entry is the default for empty slots, second is what fresh
/// recordings get assigned.
pub const EMOJI_CATALOG: &[&str] = &[
    "➕", "🎙️", "👏", "😂", "🎺", "❌", "🚪", "🥁", "👽", "📞", "🐶", "🐱", "💥",
    "💧", "🚗", "🔔", "👻", "🤖", "⚡", "🌊", "🎵", "🎶", "🎤", "🎧", "🔈",
    "🔊", "🔥", "💨", "💬", "🛑", "✅", "⛔", "⚠", "💯", "💸", "💡", "💣",
    "💀", "❤", "⭐", "🎉", "🤯", "🤔", "...", "1", "2", "3", "4", "5",
];

/// Default emoji for an unassigned slot
pub const EMPTY_EMOJI: &str = "➕";

/// Emoji assigned to freshly recorded takes
pub const RECORDING_EMOJI: &str = "🎙️";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_color_values() {
        // Spot-check a few well-known entries
        assert_eq!(ColorName::Blue.rgb(), Color32::from_rgb(60, 141, 188));
        assert_eq!(ColorName::Yellow.rgb(), Color32::from_rgb(240, 219, 46));
        assert_eq!(ColorName::Empty.rgb(), Color32::from_rgb(60, 60, 60));
    }

    #[test]
    fn test_text_contrast_rule() {
        // Yellow is the only background bright enough to need black text
        for color in ColorName::all() {
            if *color == ColorName::Yellow {
                assert_eq!(color.text_color(), Color32::BLACK);
            } else {
                assert_eq!(color.text_color(), Color32::WHITE);
            }
        }
    }

    #[test]
    fn test_all_colors_have_unique_labels() {
        let labels: Vec<&str> = ColorName::all().iter().map(|c| c.label()).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(labels.len(), sorted.len(), "Duplicate palette labels found");
    }

    #[test]
    fn test_default_is_empty() {
        assert_eq!(ColorName::default(), ColorName::Empty);
    }

    #[test]
    fn test_emoji_catalog_front_entries() {
        // The editor relies on these two being stable
        assert_eq!(EMOJI_CATALOG[0], EMPTY_EMOJI);
        assert_eq!(EMOJI_CATALOG[1], RECORDING_EMOJI);
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&ColorName::Teal).unwrap();
        assert_eq!(json, "\"Teal\"");
        let back: ColorName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ColorName::Teal);
    }
}
