use egui::{Color32, FontId, FontFamily};

// === Padboard Design Tokens ===

// 1. Window chrome
pub const WINDOW_BG: Color32 = Color32::from_rgb(30, 30, 30);

// 2. Button cells
pub const CELL_WIDTH: f32 = 150.0;
pub const CELL_HEIGHT: f32 = 110.0;
pub const CELL_SPACING: f32 = 10.0;
pub const CELL_ROUNDING: f32 = 6.0;

// 3. Hotkey badge (small dark tag in the cell corner)
pub const BADGE_BG: Color32 = Color32::from_rgb(34, 34, 34);
pub const BADGE_TEXT: Color32 = Color32::WHITE;

// 4. Record button states
pub const RECORD_IDLE: Color32 = Color32::from_rgb(221, 75, 57);
pub const RECORD_BLINK: Color32 = Color32::from_rgb(85, 85, 85);
/// Blink half-period while recording
pub const RECORD_BLINK_MS: u64 = 500;

// 5. Fonts
pub fn emoji_font() -> FontId {
    FontId::new(28.0, FontFamily::Proportional)
}

pub fn name_font() -> FontId {
    FontId::new(13.0, FontFamily::Proportional)
}

pub fn badge_font() -> FontId {
    FontId::new(10.0, FontFamily::Monospace)
}

/// Apply the app-wide dark look
pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = WINDOW_BG;
    visuals.window_fill = Color32::from_rgb(51, 51, 51);
    ctx.set_visuals(visuals);
}
