// ManaDash - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation
// 3. Store and dashboard state construction
// 4. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export library modules so `gui.rs` can use `crate::app::...` etc.
pub use manadash::app;
pub use manadash::core;
pub use manadash::platform;
pub use manadash::ui;
pub use manadash::util;

use clap::Parser;
use std::path::PathBuf;

/// ManaDash - live lists of mana pledge and revoke events.
///
/// Reads events from a JSON-lines file (one event per line) and shows them in
/// a "Pledged" and a "Revoked" list.
#[derive(Parser, Debug)]
#[command(name = "ManaDash", version, about)]
struct Cli {
    /// JSON-lines event file to load.
    events: Option<PathBuf>,

    /// Keep watching the event file for appended lines.
    #[arg(short = 'f', long = "follow")]
    follow: bool,

    /// List order: "newest-first" or "chronological" (overrides config.toml).
    #[arg(short = 'o', long = "order")]
    order: Option<String>,

    /// Alternative config.toml path.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is loaded before logging so [logging] can take effect; its
    // warnings are logged once the subscriber is installed.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform_paths.config_file());
    let (config, config_warnings) = platform::config::load_config(&config_path);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "ManaDash starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    // CLI order overrides config.
    let mut warnings = config_warnings;
    let order = match cli.order.as_deref() {
        Some(value) => match core::model::ListOrder::parse(value) {
            Some(order) => order,
            None => {
                let msg = format!(
                    "--order '{value}' is not recognised. Using {}.",
                    config.list_order.label()
                );
                tracing::warn!("{}", msg);
                warnings.push(msg);
                config.list_order
            }
        },
        None => config.list_order,
    };

    let source = cli.events.map(|path| gui::FeedSource {
        path,
        follow: cli.follow,
        poll_interval_ms: config.poll_interval_ms,
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([900.0, 420.0])
            .with_min_inner_size([560.0, 320.0]),
        ..Default::default()
    };

    let debug = cli.debug;
    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx, config.dark_mode, config.font_size);

            let store = core::store::ManaStore::new(config.max_events);
            let repaint_ctx = cc.egui_ctx.clone();
            let mut state = app::state::DashboardState::new(store, order, debug, move || {
                repaint_ctx.request_repaint()
            });
            for warning in warnings {
                state.push_warning(warning);
            }

            Ok(Box::new(gui::ManaDashApp::new(state, source)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch ManaDash GUI: {e}");
        std::process::exit(1);
    }
}
