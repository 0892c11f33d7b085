// ManaDash - ui/panels/pledge_revoke_list.rs
//
// Draws a `PanelView`: a framed card with a heading and a list body that
// scrolls once it exceeds the view's max height. Stateless; everything comes
// from the view.

use crate::core::model::ListEntry;
use crate::core::panel::{Overflow, PanelView};
use crate::ui::theme;

/// Draw `view` into `ui`.
pub fn show(ui: &mut egui::Ui, view: &PanelView) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.heading(&view.title);
        ui.add_space(theme::ROW_SPACING * 2.0);

        let scroll = match view.style.overflow_y {
            Overflow::Auto => egui::ScrollArea::vertical(),
        };
        scroll
            .id_salt(("pledge_revoke_list", &view.title))
            .max_height(view.style.max_height)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for entry in &view.body {
                    show_entry(ui, entry, view.style.font_size);
                    ui.add_space(theme::ROW_SPACING);
                }
            });
    });
}

fn show_entry(ui: &mut egui::Ui, entry: &ListEntry, font_size: f32) {
    let dark_mode = ui.visuals().dark_mode;
    ui.vertical(|ui| {
        ui.label(egui::RichText::new(&entry.text).size(font_size));
        if let Some(ref detail) = entry.detail {
            ui.label(
                egui::RichText::new(detail)
                    .size(font_size * 0.9)
                    .color(theme::detail_colour(dark_mode)),
            );
        }
    });
    ui.separator();
}
