// src/gui/mod.rs
pub mod editor;
pub mod theme;
pub mod widgets;

use std::path::{Path, PathBuf};
use std::time::Instant;

use egui::{Color32, RichText, Vec2, ViewportCommand};
use tracing::{debug, info, warn};

use crate::button::{first_empty_slot, GridFormat};
use crate::gui::editor::{ButtonEditor, EditorAction};
use crate::hotkeys::HotkeyRegistry;
use crate::palette::{ColorName, RECORDING_EMOJI};
use crate::playback::{ChannelPool, POLL_INTERVAL};
use crate::profile::Profile;
use crate::recorder::Recorder;
use crate::settings::AppSettings;
use crate::storage;

/// A blocking message box (errors, notices)
struct Modal {
    title: String,
    message: String,
}

// Main application - owns the profile, the hotkey registry, the channel
// pool and the (at most one) recording thread
pub struct PadboardApp {
    settings: AppSettings,

    /// Current layout; always carries all 24 slots
    profile: Profile,
    profile_path: Option<PathBuf>,

    /// None when no audio output device could be opened; the board then
    /// runs configure-only, like the original did without its mixer
    pool: Option<ChannelPool>,

    /// Process-wide key -> button registry
    hotkeys: HotkeyRegistry,

    /// In-flight take plus its start time (drives the blink)
    recording: Option<(Recorder, Instant)>,

    /// Finished take waiting for the assign/discard decision
    pending_take: Option<PathBuf>,

    /// Open button editor, if any
    editor: Option<ButtonEditor>,

    modal: Option<Modal>,
    confirm_new_profile: bool,
    show_about: bool,

    /// Last channel pool sweep; the pool is polled on a fixed cadence,
    /// not every frame
    last_channel_poll: Instant,

    /// Window title needs a viewport command; only send it on change
    title_dirty: bool,
}

impl PadboardApp {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        // Reopen the last profile when it still exists
        let mut profile_path = None;
        let mut profile = Profile::default();
        profile.grid = settings.grid_format;
        if let Some(last) = &settings.last_profile {
            if last.exists() {
                match Profile::load(last) {
                    Ok(p) => {
                        info!("[App] Reopened profile {}", last.display());
                        profile = p;
                        profile_path = Some(last.clone());
                    }
                    Err(e) => warn!("[App] Could not reopen {}: {}", last.display(), e),
                }
            }
        }

        let pool = match ChannelPool::new(settings.master_volume) {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!("[App] Audio output unavailable: {} (playback disabled)", e);
                None
            }
        };

        let mut hotkeys = HotkeyRegistry::new();
        hotkeys.rebuild(&profile.buttons, profile.grid.capacity());

        Self {
            settings,
            profile,
            profile_path,
            pool,
            hotkeys,
            recording: None,
            pending_take: None,
            editor: None,
            modal: None,
            confirm_new_profile: false,
            show_about: false,
            last_channel_poll: Instant::now(),
            title_dirty: true,
        }
    }

    fn show_error(&mut self, title: &str, message: impl Into<String>) {
        let message = message.into();
        warn!("[App] {}: {}", title, message);
        self.modal = Some(Modal {
            title: title.to_string(),
            message,
        });
    }

    fn show_notice(&mut self, title: &str, message: impl Into<String>) {
        self.modal = Some(Modal {
            title: title.to_string(),
            message: message.into(),
        });
    }

    // ---------- Playback ----------

    /// Toggle a button's sound (hotkey or click on an assigned button)
    fn activate_button(&mut self, id: usize) {
        let Some(sound) = self.profile.buttons[id].sound.clone() else {
            warn!("[App] Button {} has no sound assigned", id);
            return;
        };
        let Some(pool) = self.pool.as_mut() else {
            warn!("[App] Playback disabled, ignoring button {}", id);
            return;
        };
        let path = storage::resolve_sound_path(&sound);
        if let Err(e) = pool.toggle(id, &path) {
            self.show_error("Playback error", e.to_string());
        }
    }

    /// Left click: play when assigned, configure when empty
    fn click_button(&mut self, id: usize) {
        if self.profile.buttons[id].sound.is_none() {
            self.open_editor(id);
        } else {
            self.activate_button(id);
        }
    }

    fn process_hotkeys(&mut self) {
        for id in self.hotkeys.poll() {
            debug!("[App] Hotkey fired for button {}", id);
            self.activate_button(id);
        }
    }

    /// Fixed-cadence sweep keeping visual state in sync with the pool
    fn poll_channels(&mut self) {
        if self.last_channel_poll.elapsed() < POLL_INTERVAL {
            return;
        }
        self.last_channel_poll = Instant::now();
        if let Some(pool) = self.pool.as_mut() {
            let finished = pool.poll();
            if !finished.is_empty() {
                debug!("[App] {} channel(s) drained: {:?}", finished.len(), finished);
            }
        }
    }

    // ---------- Editor ----------

    fn open_editor(&mut self, id: usize) {
        self.editor = Some(ButtonEditor::from_config(&self.profile.buttons[id]));
    }

    /// Apply a saved editor to the button; the hotkey swap goes first
    /// and can reject the whole save
    fn apply_editor(&mut self, editor: &ButtonEditor) -> Result<(), String> {
        let id = editor.button_id;
        let visible = id < self.profile.grid.capacity();

        if visible && self.hotkeys.is_available() {
            self.hotkeys
                .rebind(id, editor.hotkey.as_deref())
                .map_err(|e| match e {
                    crate::hotkeys::HotkeyError::KeyInUse { key, holder } => format!(
                        "Key '{}' is already assigned to '{}'.",
                        key.to_uppercase(),
                        self.profile.buttons[holder].name
                    ),
                    other => other.to_string(),
                })?;
        } else if editor.hotkey != self.profile.buttons[id].hotkey {
            // Stored for later: hidden buttons and hotkey-less systems
            // keep the key in config only
            debug!("[App] Hotkey for button {} stored but not registered", id);
        }

        let config = &mut self.profile.buttons[id];
        config.emoji = editor.emoji.clone();
        let name = editor.name.trim();
        if !name.is_empty() {
            config.name = name.to_string();
        }
        config.color = editor.color;
        config.sound = editor.sound.clone();
        config.hotkey = editor.hotkey.clone();
        Ok(())
    }

    // ---------- Recording ----------

    fn toggle_recording(&mut self) {
        if self.recording.is_some() {
            self.finish_recording();
            return;
        }
        // Keep the microphone clean of our own output
        if let Some(pool) = self.pool.as_mut() {
            pool.stop_all();
        }
        info!("[App] Recording started");
        self.recording = Some((Recorder::start(), Instant::now()));
    }

    fn finish_recording(&mut self) {
        let Some((recorder, _)) = self.recording.take() else {
            return;
        };
        match recorder.stop() {
            Ok(Some(path)) => self.pending_take = Some(path),
            Ok(None) => self.show_notice("Recording", "Nothing was recorded."),
            Err(e) => self.show_error("Recording error", e.to_string()),
        }
    }

    /// A dead capture thread must not blink forever
    fn check_recorder_health(&mut self) {
        let failed = self
            .recording
            .as_ref()
            .and_then(|(rec, _)| rec.take_error());
        if let Some(e) = failed {
            self.show_error("Recording error", e.to_string());
            // Salvage whatever made it into the buffer
            self.finish_recording();
        }
    }

    fn assign_take(&mut self, path: &Path) {
        let Some(slot) = first_empty_slot(&self.profile.buttons) else {
            self.show_notice(
                "Grid full",
                "No empty button found. The recording was kept in the recordings folder.",
            );
            return;
        };
        let config = &mut self.profile.buttons[slot];
        config.sound = Some(storage::relativize_sound_path(path));
        config.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Recording".to_string());
        config.emoji = RECORDING_EMOJI.to_string();
        config.color = ColorName::Purple;
        info!("[App] Recording assigned to button {}", slot + 1);
    }

    // ---------- Profiles ----------

    fn window_title(&self) -> String {
        match &self.profile_path {
            Some(p) => format!(
                "Padboard - {}",
                p.file_name().unwrap_or_default().to_string_lossy()
            ),
            None => "Padboard - New Profile".to_string(),
        }
    }

    fn new_profile(&mut self) {
        if let Some(pool) = self.pool.as_mut() {
            pool.stop_all();
        }
        self.profile = Profile::default();
        self.profile_path = None;
        self.settings.grid_format = self.profile.grid;
        self.hotkeys
            .rebuild(&self.profile.buttons, self.profile.grid.capacity());
        self.title_dirty = true;
        info!("[App] New profile");
    }

    fn load_profile_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Profiles", &["json"])
            .set_directory(storage::profiles_dir())
            .pick_file();
        if let Some(path) = picked {
            self.load_profile(&path);
        }
    }

    fn load_profile(&mut self, path: &Path) {
        match Profile::load(path) {
            Ok(profile) => {
                if let Some(pool) = self.pool.as_mut() {
                    pool.stop_all();
                }
                self.profile = profile;
                self.profile_path = Some(path.to_path_buf());
                self.settings.grid_format = self.profile.grid;
                self.settings.last_profile = Some(path.to_path_buf());
                self.hotkeys
                    .rebuild(&self.profile.buttons, self.profile.grid.capacity());
                self.title_dirty = true;
                info!("[App] Loaded profile {}", path.display());
            }
            Err(e) => self.show_error("Load error", format!("Could not load the profile:\n{}", e)),
        }
    }

    fn save_profile(&mut self) {
        match self.profile_path.clone() {
            Some(path) => self.save_profile_to(&path),
            None => self.save_profile_as(),
        }
    }

    fn save_profile_as(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Profiles", &["json"])
            .set_directory(storage::profiles_dir())
            .set_file_name("profile.json")
            .save_file();
        if let Some(path) = picked {
            self.save_profile_to(&path);
        }
    }

    fn save_profile_to(&mut self, path: &Path) {
        match self.profile.save(path) {
            Ok(()) => {
                self.profile_path = Some(path.to_path_buf());
                self.settings.last_profile = Some(path.to_path_buf());
                self.title_dirty = true;
                info!("[App] Saved profile {}", path.display());
            }
            Err(e) => self.show_error("Save error", format!("Could not save the profile:\n{}", e)),
        }
    }

    fn change_grid(&mut self, format: GridFormat) {
        if format == self.profile.grid {
            return;
        }
        info!("[App] Grid format: {}", format.label());
        self.profile.grid = format;
        self.settings.grid_format = format;
        // Hidden buttons keep their config but lose their active hotkey
        self.hotkeys
            .rebuild(&self.profile.buttons, format.capacity());
    }

    // ---------- Rendering ----------

    fn controls_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            // Record toggle, blinking while a take is running
            let (label, fill) = match &self.recording {
                Some((_, started)) => {
                    let on = (started.elapsed().as_millis()
                        / theme::RECORD_BLINK_MS as u128)
                        % 2
                        == 0;
                    (
                        "⏺ Recording...",
                        if on { theme::RECORD_IDLE } else { theme::RECORD_BLINK },
                    )
                }
                None => ("⏺ Record", theme::RECORD_IDLE),
            };
            let record = egui::Button::new(RichText::new(label).color(Color32::WHITE)).fill(fill);
            if ui.add(record).clicked() {
                self.toggle_recording();
            }

            ui.separator();

            if ui.button("New Profile").clicked() {
                self.confirm_new_profile = true;
            }
            if ui.button("Load Profile...").clicked() {
                self.load_profile_dialog();
            }
            if ui.button("Save Profile").clicked() {
                self.save_profile();
            }
            if ui.button("Save As...").clicked() {
                self.save_profile_as();
            }
            if ui.button("About...").clicked() {
                self.show_about = true;
            }

            ui.separator();

            ui.label("Volume:");
            let mut percent = self.settings.master_volume * 100.0;
            let slider = egui::Slider::new(&mut percent, 0.0..=100.0)
                .show_value(false)
                .integer();
            if ui.add(slider).changed() {
                self.settings.master_volume = percent / 100.0;
                if let Some(pool) = self.pool.as_mut() {
                    pool.set_volume(self.settings.master_volume);
                }
            }
            ui.label(format!("{:3.0}%", percent));

            ui.separator();

            ui.label("Format:");
            let mut selected = self.profile.grid;
            egui::ComboBox::from_id_salt("grid_format")
                .selected_text(selected.label())
                .show_ui(ui, |ui| {
                    for format in GridFormat::all() {
                        ui.selectable_value(&mut selected, *format, format.label());
                    }
                });
            self.change_grid(selected);
        });
    }

    fn button_grid(&mut self, ui: &mut egui::Ui) {
        let cols = self.profile.grid.columns();
        let rows = self.profile.grid.rows();
        ui.spacing_mut().item_spacing = Vec2::splat(theme::CELL_SPACING);

        let mut clicked = None;
        let mut configure = None;

        for row in 0..rows {
            ui.horizontal(|ui| {
                for col in 0..cols {
                    let id = row * cols + col;
                    let playing = self
                        .pool
                        .as_ref()
                        .is_some_and(|pool| pool.is_playing(id));
                    let response = widgets::sound_button(ui, &self.profile.buttons[id], playing);
                    if response.clicked() {
                        clicked = Some(id);
                    }
                    response.context_menu(|ui| {
                        if ui.button("Configure button...").clicked() {
                            configure = Some(id);
                            ui.close_menu();
                        }
                    });
                }
            });
        }

        if let Some(id) = clicked {
            self.click_button(id);
        }
        if let Some(id) = configure {
            self.open_editor(id);
        }
    }

    fn dialogs(&mut self, ctx: &egui::Context) {
        // Button editor
        if let Some(mut editor) = self.editor.take() {
            match editor.show(ctx) {
                EditorAction::Open => self.editor = Some(editor),
                EditorAction::Cancel => {}
                EditorAction::Save => {
                    if let Err(message) = self.apply_editor(&editor) {
                        editor.error = Some(message);
                        self.editor = Some(editor);
                    }
                }
            }
        }

        // Assign-or-discard decision for a finished take
        if let Some(path) = self.pending_take.clone() {
            let mut decided = false;
            egui::Window::new("Recording finished")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Recording complete!");
                    ui.label("Assign this recording to the first empty button?");
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.button("Assign").clicked() {
                            self.assign_take(&path);
                            decided = true;
                        }
                        if ui.button("Discard").clicked() {
                            if let Err(e) = std::fs::remove_file(&path) {
                                warn!("[App] Could not delete {}: {}", path.display(), e);
                            } else {
                                info!("[App] Discarded take {}", path.display());
                            }
                            decided = true;
                        }
                    });
                });
            if decided {
                self.pending_take = None;
            }
        }

        // New-profile confirmation
        if self.confirm_new_profile {
            let mut decided = false;
            egui::Window::new("Create new profile")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Discard the current layout? This cannot be undone.");
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.button("Discard and create").clicked() {
                            self.new_profile();
                            decided = true;
                        }
                        if ui.button("Keep current").clicked() {
                            decided = true;
                        }
                    });
                });
            if decided {
                self.confirm_new_profile = false;
            }
        }

        // Error / notice box
        if let Some(modal) = self.modal.take() {
            let mut keep = true;
            egui::Window::new(&modal.title)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&modal.message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        keep = false;
                    }
                });
            if keep {
                self.modal = Some(modal);
            }
        }

        // About box
        if self.show_about {
            let mut open = true;
            egui::Window::new("About Padboard")
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.heading(format!("Padboard v{}", env!("CARGO_PKG_VERSION")));
                    ui.add_space(6.0);
                    ui.label("A desktop soundboard: bind clips, colors, emoji and global hotkeys to a grid of buttons, and record new clips straight from the microphone.");
                    ui.add_space(6.0);
                    ui.label("Released under the MIT license. The software is provided \"as is\", without warranty of any kind.");
                });
            self.show_about = open;
        }
    }
}

impl eframe::App for PadboardApp {
    // Called by eframe periodically and on exit
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.settings.save();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.title_dirty {
            ctx.send_viewport_cmd(ViewportCommand::Title(self.window_title()));
            self.title_dirty = false;
        }

        // eframe only calls save() with its persistence feature on;
        // flush settings ourselves when the window is closing
        if ctx.input(|i| i.viewport().close_requested()) {
            info!("[App] Window closing, saving settings");
            self.finish_recording();
            self.settings.save();
        }

        self.process_hotkeys();
        self.poll_channels();
        self.check_recorder_health();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.controls_row(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.button_grid(ui);
        });

        self.dialogs(ctx);

        // Keep the playing state live even when the user is idle
        ctx.request_repaint_after(POLL_INTERVAL);
    }
}
