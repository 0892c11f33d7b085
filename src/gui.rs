// ManaDash - gui.rs
//
// Top-level eframe::App implementation.
// Drains the event feed into the store each frame and lays out the menu bar,
// status bar, dashboard, and dialogs.

use crate::app::feed::FeedManager;
use crate::app::state::DashboardState;
use crate::ui;
use crate::util::constants::MAX_FEED_MESSAGES_PER_FRAME;
use std::path::PathBuf;
use std::time::Duration;

/// Where events come from and how to read them.
#[derive(Debug, Clone)]
pub struct FeedSource {
    pub path: PathBuf,
    pub follow: bool,
    pub poll_interval_ms: u64,
}

/// The ManaDash application.
pub struct ManaDashApp {
    pub state: DashboardState,
    pub feed: FeedManager,
    pub source: Option<FeedSource>,
}

impl ManaDashApp {
    /// Create the application and start the feed if a source was given.
    pub fn new(state: DashboardState, source: Option<FeedSource>) -> Self {
        let mut app = Self {
            state,
            feed: FeedManager::new(),
            source,
        };
        app.start_feed();
        app
    }

    fn start_feed(&mut self) {
        if let Some(ref source) = self.source {
            self.feed
                .start(source.path.clone(), source.follow, source.poll_interval_ms);
            self.state.status_message = format!("Loading {}...", source.path.display());
        }
    }
}

impl eframe::App for ManaDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply feed messages. Store mutations invalidate the panels, which
        // request a repaint through the context.
        for msg in self.feed.poll_progress(MAX_FEED_MESSAGES_PER_FRAME) {
            self.state.apply_feed_progress(msg);
        }
        if let Some(ref source) = self.source {
            if self.feed.is_active() {
                ctx.request_repaint_after(Duration::from_millis(source.poll_interval_ms));
            }
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let has_source = self.source.is_some();
                    ui.add_enabled_ui(has_source, |ui| {
                        if ui.button("Reload").clicked() {
                            self.state.clear();
                            self.start_feed();
                            ui.close_menu();
                        }
                    });
                    if ui.button("Clear").clicked() {
                        self.state.clear();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    let label = format!("Warnings ({})", self.state.warnings.len());
                    if ui.button(label).clicked() {
                        self.state.show_warnings = true;
                        ui.close_menu();
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.state.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    if self.feed.is_active() && self.source.as_ref().is_some_and(|s| s.follow) {
                        ui.label(
                            egui::RichText::new(" \u{25cf} LIVE ")
                                .strong()
                                .color(egui::Color32::from_rgb(34, 197, 94)),
                        );
                        ui.separator();
                    }
                    ui.label(&self.state.status_message);
                    if !self.state.warnings.is_empty()
                        && ui
                            .small_button(
                                egui::RichText::new(format!(
                                    "\u{26a0} {}",
                                    self.state.warnings.len()
                                ))
                                .color(ui::theme::WARNING_TEXT),
                            )
                            .clicked()
                    {
                        self.state.show_warnings = true;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let (pledges, revokes, totals) = self.state.store.read(|r| {
                            (
                                r.pledge_events().len(),
                                r.revoke_events().len(),
                                r.network_totals(),
                            )
                        });
                        ui.label(format!(
                            "{pledges} pledges \u{00b7} {revokes} revokes \u{00b7} \
                             network access {:.2} / consensus {:.2}",
                            totals.access, totals.consensus
                        ));
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::mana_events::render(ui, &mut self.state);
        });

        ui::panels::warnings::render(ctx, &mut self.state);
        ui::panels::about::render(ctx, &mut self.state);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.feed.stop();
    }
}
