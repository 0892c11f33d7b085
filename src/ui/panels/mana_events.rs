// ManaDash - ui/panels/mana_events.rs
//
// Central area: node filter and order controls above the "Pledged" and
// "Revoked" lists, side by side.
//
// Each list is rendered through its mounted panel, which only rebuilds its
// view when the store fields it read have changed. egui still paints the
// cached view every frame.

use crate::app::state::DashboardState;
use crate::core::model::ListOrder;
use crate::ui::panels::pledge_revoke_list;
use crate::ui::theme;

/// Render the central dashboard area.
pub fn render(ui: &mut egui::Ui, state: &mut DashboardState) {
    ui.horizontal(|ui| {
        ui.label("Node filter:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.node_filter_input)
                .hint_text("node ID prefix")
                .desired_width(220.0),
        );
        if response.changed() {
            state.apply_node_filter();
        }
        if !state.node_filter_input.is_empty() && ui.small_button("\u{2715}").clicked() {
            state.node_filter_input.clear();
            state.apply_node_filter();
        }

        ui.separator();
        ui.label("Order:");
        let mut order = state.order;
        ui.radio_value(&mut order, ListOrder::NewestFirst, "Newest first");
        ui.radio_value(&mut order, ListOrder::Chronological, "Chronological");
        state.set_order(order);
    });

    ui.add_space(theme::PANEL_SPACING);

    let pledged_build = state.pledged_props();
    let revoked_build = state.revoked_props();
    ui.columns(2, |columns| {
        let view = state.pledged.view(pledged_build);
        pledge_revoke_list::show(&mut columns[0], view);

        let view = state.revoked.view(revoked_build);
        pledge_revoke_list::show(&mut columns[1], view);
    });

    if state.debug_mode {
        ui.add_space(theme::PANEL_SPACING);
        ui.label(
            egui::RichText::new(format!(
                "renders: pledged {} / revoked {} \u{00b7} observing: {:?} / {:?} \u{00b7} listeners: {}",
                state.pledged.render_count(),
                state.revoked.render_count(),
                state.pledged.observed(),
                state.revoked.observed(),
                state.store.listener_count(),
            ))
            .small()
            .weak(),
        );
    }
}
