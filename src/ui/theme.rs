// ManaDash - ui/theme.rs
//
// Colours, visuals, and layout constants.
// No dependencies on app state or business logic.

use egui::{Color32, FontId, TextStyle};

/// Apply the configured light/dark visuals and body font size.
pub fn apply(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });
    ctx.style_mut(|style| {
        style.text_styles.insert(
            TextStyle::Body,
            FontId::new(font_size, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            TextStyle::Button,
            FontId::new(font_size, egui::FontFamily::Proportional),
        );
    });
}

/// Colour of a list row's secondary metadata line.
pub fn detail_colour(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(156, 163, 175) // Gray 400
    } else {
        Color32::from_rgb(107, 114, 128) // Gray 500
    }
}

/// Warning text colour.
pub const WARNING_TEXT: Color32 = Color32::from_rgb(253, 186, 116); // Orange 300

/// Layout constants.
pub const PANEL_SPACING: f32 = 8.0;
pub const ROW_SPACING: f32 = 2.0;
pub const STATUS_BAR_HEIGHT: f32 = 28.0;
