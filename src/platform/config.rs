// ManaDash - platform/config.rs
//
// Platform-specific directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::ListOrder;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for ManaDash data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/manadash/ or %APPDATA%\ManaDash\config\)
    pub config_dir: PathBuf,

    /// Data directory for logs and caches.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Full path of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file still loads in
/// an older binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[store]` section.
    pub store: StoreSection,
    /// `[feed]` section.
    pub feed: FeedSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// "newest-first" or "chronological".
    pub list_order: Option<String>,
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
}

/// `[store]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Events retained per list.
    pub max_events: Option<usize>,
}

/// `[feed]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FeedSection {
    /// Follow-mode poll interval in milliseconds.
    pub poll_interval_ms: Option<u64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- UI --
    pub list_order: ListOrder,
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    pub font_size: f32,

    // -- Store --
    pub max_events: usize,

    // -- Feed --
    pub poll_interval_ms: u64,

    // -- Logging --
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            list_order: ListOrder::default(),
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            max_events: constants::DEFAULT_MAX_EVENTS,
            poll_interval_ms: constants::FEED_POLL_INTERVAL_MS,
            log_level: None,
            log_file: None,
        }
    }
}

/// Parse config.toml text.
pub fn parse_config(content: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

fn out_of_range(field: &str, value: impl ToString, expected: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

/// Validate every field against its named bounds.
///
/// Invalid values keep their default and produce one error each; all errors
/// are collected rather than stopping at the first.
pub fn validate(raw: &RawConfig) -> (AppConfig, Vec<ConfigError>) {
    let mut config = AppConfig::default();
    let mut errors = Vec::new();

    // -- UI: list_order --
    if let Some(ref order) = raw.ui.list_order {
        match ListOrder::parse(order) {
            Some(o) => config.list_order = o,
            None => errors.push(out_of_range(
                "ui.list_order",
                order,
                "\"newest-first\" or \"chronological\"",
            )),
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            _ => errors.push(out_of_range("ui.theme", theme, "\"dark\" or \"light\"")),
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            errors.push(out_of_range(
                "ui.font_size",
                size,
                format!("{}-{}", constants::MIN_FONT_SIZE, constants::MAX_FONT_SIZE),
            ));
        }
    }

    // -- Store: max_events --
    if let Some(max) = raw.store.max_events {
        if (constants::MIN_MAX_EVENTS..=constants::ABSOLUTE_MAX_EVENTS).contains(&max) {
            config.max_events = max;
        } else {
            errors.push(out_of_range(
                "store.max_events",
                max,
                format!(
                    "{}-{}",
                    constants::MIN_MAX_EVENTS,
                    constants::ABSOLUTE_MAX_EVENTS
                ),
            ));
        }
    }

    // -- Feed: poll_interval_ms --
    if let Some(ms) = raw.feed.poll_interval_ms {
        if (constants::MIN_FEED_POLL_INTERVAL_MS..=constants::MAX_FEED_POLL_INTERVAL_MS)
            .contains(&ms)
        {
            config.poll_interval_ms = ms;
        } else {
            errors.push(out_of_range(
                "feed.poll_interval_ms",
                ms,
                format!(
                    "{}-{}",
                    constants::MIN_FEED_POLL_INTERVAL_MS,
                    constants::MAX_FEED_POLL_INTERVAL_MS
                ),
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            errors.push(out_of_range(
                "logging.level",
                level,
                "error, warn, info, debug, trace",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    (config, errors)
}

/// Load and validate config.toml at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// warnings. A missing file yields defaults with no warnings (first run).
/// An unreadable or unparseable file yields defaults and one warning; the
/// application still starts.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let raw = std::fs::read_to_string(config_path)
        .map_err(|source| ConfigError::Io {
            path: config_path.to_path_buf(),
            source,
        })
        .and_then(|content| parse_config(&content, config_path));

    let raw = match raw {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            return (AppConfig::default(), vec![msg]);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let (config, errors) = validate(&raw);
    let warnings: Vec<String> = errors
        .iter()
        .map(|e| format!("{e}. Using default."))
        .collect();

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}
