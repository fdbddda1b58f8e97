use std::path::PathBuf;

use egui::{Color32, Context, RichText};

use crate::button::{ButtonConfig, EMPTY_NAME};
use crate::palette::{ColorName, EMOJI_CATALOG};
use crate::storage;

// =======================================================================================
// BUTTON EDITOR DIALOG
// =======================================================================================

/// What the dialog wants the app to do after this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// Keep showing the dialog
    Open,
    /// Apply the edited values to the button
    Save,
    /// Discard the edits
    Cancel,
}

/// Editing state for one button; a working copy of its config
///
/// Edits only land on the real config when the app accepts a Save
/// (the hotkey swap can still be rejected by the registry).
pub struct ButtonEditor {
    pub button_id: usize,
    pub emoji: String,
    pub name: String,
    pub color: ColorName,
    pub sound: Option<PathBuf>,
    pub hotkey: Option<String>,

    /// True while waiting for the user to press the new hotkey
    capturing_key: bool,

    /// Rejection from the hotkey registry, shown inline
    pub error: Option<String>,
}

impl ButtonEditor {
    pub fn from_config(config: &ButtonConfig) -> Self {
        Self {
            button_id: config.id,
            emoji: config.emoji.clone(),
            name: config.name.clone(),
            color: config.color,
            sound: config.sound.clone(),
            hotkey: config.hotkey.clone(),
            capturing_key: false,
            error: None,
        }
    }

    /// Render the dialog; returns what to do next
    pub fn show(&mut self, ctx: &Context) -> EditorAction {
        // Swallow the next keystroke while capturing, before egui's
        // widgets get a chance to react to it
        if self.capturing_key {
            if let Some(key) = captured_key(ctx) {
                self.hotkey = Some(key.to_string());
                self.capturing_key = false;
                self.error = None;
            } else if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.capturing_key = false;
            }
        }

        let mut action = EditorAction::Open;
        let mut open = true;

        egui::Window::new("Button Configuration")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Icon (emoji):");
                egui::ComboBox::from_id_salt("emoji_picker")
                    .selected_text(&self.emoji)
                    .show_ui(ui, |ui| {
                        for glyph in EMOJI_CATALOG {
                            ui.selectable_value(&mut self.emoji, glyph.to_string(), *glyph);
                        }
                    });

                ui.add_space(8.0);
                ui.label("Name (short text):");
                ui.text_edit_singleline(&mut self.name);

                ui.add_space(8.0);
                ui.label("Button color:");
                egui::ComboBox::from_id_salt("color_picker")
                    .selected_text(self.color.label())
                    .show_ui(ui, |ui| {
                        for color in ColorName::all() {
                            ui.selectable_value(&mut self.color, *color, color.label());
                        }
                    });

                ui.add_space(8.0);
                let sound_label = match &self.sound {
                    Some(p) => p.display().to_string(),
                    None => "(no sound assigned)".to_string(),
                };
                ui.label(format!("Sound: {}", sound_label));
                if ui.button("🔊 Change sound file...").clicked() {
                    self.pick_sound_file();
                }

                ui.add_space(8.0);
                let key_label = match &self.hotkey {
                    Some(k) => k.to_uppercase(),
                    None => "--".to_string(),
                };
                ui.label(format!("Assigned key: {}", key_label));
                ui.horizontal(|ui| {
                    let capture_label = if self.capturing_key {
                        "... press a key (Esc cancels) ..."
                    } else {
                        "🎹 Change key..."
                    };
                    if ui.button(capture_label).clicked() {
                        self.capturing_key = !self.capturing_key;
                    }
                    if self.hotkey.is_some() && ui.button("Clear key").clicked() {
                        self.hotkey = None;
                        self.error = None;
                    }
                });

                if let Some(error) = &self.error {
                    ui.add_space(6.0);
                    ui.label(RichText::new(error).color(Color32::from_rgb(255, 120, 100)));
                }

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!self.capturing_key, egui::Button::new("Save changes"))
                        .clicked()
                    {
                        action = EditorAction::Save;
                    }
                    if ui.button("Cancel").clicked() {
                        action = EditorAction::Cancel;
                    }
                });
            });

        if !open {
            action = EditorAction::Cancel;
        }
        action
    }

    fn pick_sound_file(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Sound files", &["wav", "mp3", "ogg", "flac"])
            .set_directory(storage::data_dir())
            .pick_file();
        if let Some(path) = picked {
            // Name a still-unnamed slot after the file
            if self.name == EMPTY_NAME {
                if let Some(stem) = path.file_stem() {
                    self.name = stem.to_string_lossy().to_string();
                }
            }
            self.sound = Some(storage::relativize_sound_path(&path));
        }
    }
}

/// Map the next pressed key to a canonical key name, if it is one we
/// support for hotkeys
fn captured_key(ctx: &Context) -> Option<&'static str> {
    ctx.input(|i| {
        i.events.iter().find_map(|event| match event {
            egui::Event::Key { key, pressed: true, .. } => egui_key_name(*key),
            _ => None,
        })
    })
}

/// Canonical name of an egui key, for the keys the registry supports
fn egui_key_name(key: egui::Key) -> Option<&'static str> {
    use egui::Key;
    let name = match key {
        Key::A => "a",
        Key::B => "b",
        Key::C => "c",
        Key::D => "d",
        Key::E => "e",
        Key::F => "f",
        Key::G => "g",
        Key::H => "h",
        Key::I => "i",
        Key::J => "j",
        Key::K => "k",
        Key::L => "l",
        Key::M => "m",
        Key::N => "n",
        Key::O => "o",
        Key::P => "p",
        Key::Q => "q",
        Key::R => "r",
        Key::S => "s",
        Key::T => "t",
        Key::U => "u",
        Key::V => "v",
        Key::W => "w",
        Key::X => "x",
        Key::Y => "y",
        Key::Z => "z",
        Key::Num0 => "0",
        Key::Num1 => "1",
        Key::Num2 => "2",
        Key::Num3 => "3",
        Key::Num4 => "4",
        Key::Num5 => "5",
        Key::Num6 => "6",
        Key::Num7 => "7",
        Key::Num8 => "8",
        Key::Num9 => "9",
        Key::F1 => "f1",
        Key::F2 => "f2",
        Key::F3 => "f3",
        Key::F4 => "f4",
        Key::F5 => "f5",
        Key::F6 => "f6",
        Key::F7 => "f7",
        Key::F8 => "f8",
        Key::F9 => "f9",
        Key::F10 => "f10",
        Key::F11 => "f11",
        Key::F12 => "f12",
        Key::Space => "space",
        Key::ArrowUp => "up",
        Key::ArrowDown => "down",
        Key::ArrowLeft => "left",
        Key::ArrowRight => "right",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkeys::key_code;

    #[test]
    fn test_editor_copies_config() {
        let mut config = ButtonConfig::empty(5);
        config.name = "Drum".to_string();
        config.hotkey = Some("d".to_string());

        let editor = ButtonEditor::from_config(&config);
        assert_eq!(editor.button_id, 5);
        assert_eq!(editor.name, "Drum");
        assert_eq!(editor.hotkey.as_deref(), Some("d"));
        assert!(editor.error.is_none());
    }

    #[test]
    fn test_every_capturable_key_is_registrable() {
        // The keys the editor can capture must all parse in the registry,
        // otherwise Save would fail on a key we just offered
        use egui::Key;
        let keys = [
            Key::A, Key::Z, Key::Num0, Key::Num9, Key::F1, Key::F12,
            Key::Space, Key::ArrowUp, Key::ArrowDown, Key::ArrowLeft, Key::ArrowRight,
        ];
        for key in keys {
            let name = egui_key_name(key).expect("supported key must map");
            assert!(key_code(name).is_some(), "'{}' must be registrable", name);
        }
    }

    #[test]
    fn test_unsupported_keys_are_rejected() {
        assert_eq!(egui_key_name(egui::Key::Escape), None);
        assert_eq!(egui_key_name(egui::Key::Enter), None);
        assert_eq!(egui_key_name(egui::Key::Tab), None);
    }
}
