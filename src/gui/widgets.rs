use egui::{Align2, Color32, Rounding, Sense, Stroke, Ui, Vec2};

use crate::button::ButtonConfig;
use crate::gui::theme;
use crate::palette::PLAYING_COLOR;

// =======================================================================================
// SOUND BUTTON CELL
// =======================================================================================

/// One grid cell: emoji on top, name under it, hotkey badge in the
/// top-right corner. The whole cell flips to the playing color while
/// its channel is audible.
pub fn sound_button(ui: &mut Ui, config: &ButtonConfig, playing: bool) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(
        Vec2::new(theme::CELL_WIDTH, theme::CELL_HEIGHT),
        Sense::click(),
    );

    if !ui.is_rect_visible(rect) {
        return response;
    }

    let bg = if playing {
        PLAYING_COLOR
    } else {
        config.color.rgb()
    };
    let fg = if playing {
        Color32::WHITE
    } else {
        config.color.text_color()
    };

    let painter = ui.painter();
    let rounding = Rounding::same(theme::CELL_ROUNDING);
    painter.rect_filled(rect, rounding, bg);
    if response.hovered() {
        painter.rect_stroke(rect, rounding, Stroke::new(2.0, Color32::WHITE));
    }

    // Emoji, upper half
    painter.text(
        rect.center_top() + Vec2::new(0.0, 34.0),
        Align2::CENTER_CENTER,
        &config.emoji,
        theme::emoji_font(),
        fg,
    );

    // Name, lower half (single line, elided when too long)
    painter.text(
        rect.center_bottom() - Vec2::new(0.0, 26.0),
        Align2::CENTER_CENTER,
        elide(&config.name, 18),
        theme::name_font(),
        fg,
    );

    // Hotkey badge
    let badge_text = match &config.hotkey {
        Some(key) => key.to_uppercase(),
        None => "--".to_string(),
    };
    let badge_pos = rect.right_top() + Vec2::new(-6.0, 6.0);
    let galley = painter.layout_no_wrap(badge_text, theme::badge_font(), theme::BADGE_TEXT);
    let badge_rect = egui::Rect::from_min_size(
        badge_pos - Vec2::new(galley.size().x + 8.0, 0.0),
        galley.size() + Vec2::new(8.0, 4.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(2.0), theme::BADGE_BG);
    painter.galley(badge_rect.min + Vec2::new(4.0, 2.0), galley, theme::BADGE_TEXT);

    response
}

/// Truncate a label to `max` characters with an ellipsis
fn elide(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elide_short_names_untouched() {
        assert_eq!(elide("Airhorn", 18), "Airhorn");
        assert_eq!(elide("", 18), "");
    }

    #[test]
    fn test_elide_long_names() {
        let long = "a very long button name indeed";
        let out = elide(long, 18);
        assert!(out.ends_with('…'));
        assert_eq!(out.chars().count(), 18);
    }

    #[test]
    fn test_elide_counts_chars_not_bytes() {
        // Multi-byte names must not panic or split a codepoint
        let name = "🎺🎺🎺🎺🎺🎺🎺🎺🎺🎺";
        assert_eq!(elide(name, 20), name);
        let out = elide(name, 5);
        assert_eq!(out.chars().count(), 5);
    }
}
