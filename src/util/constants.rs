// ManaDash - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "ManaDash";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "ManaDash";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// List panel presentation
// =============================================================================

/// Maximum visible height of a list panel body. Longer lists scroll.
pub const PANEL_MAX_HEIGHT: f32 = 150.0;

/// Body font size of a list panel in points (0.75 of the 16 pt base size).
pub const PANEL_FONT_SIZE: f32 = 12.0;

/// Heading shown on the pledge list.
pub const PLEDGED_TITLE: &str = "Pledged";

/// Heading shown on the revoke list.
pub const REVOKED_TITLE: &str = "Revoked";

// =============================================================================
// Store limits
// =============================================================================

/// Default number of events retained per list (pledges and revokes each).
pub const DEFAULT_MAX_EVENTS: usize = 100;

/// Minimum configurable event history length.
pub const MIN_MAX_EVENTS: usize = 1;

/// Hard upper bound on the per-list event history.
pub const ABSOLUTE_MAX_EVENTS: usize = 10_000;

/// Maximum length of the node filter text box.
pub const MAX_NODE_FILTER_LEN: usize = 64;

/// Number of leading characters of a node or transaction ID shown in a row.
pub const SHORT_ID_LEN: usize = 8;

// =============================================================================
// Event feed
// =============================================================================

/// How often the feed thread polls a followed file for appended lines (ms).
pub const FEED_POLL_INTERVAL_MS: u64 = 500;

/// How often the cancel flag is checked within each poll sleep (ms).
pub const FEED_CANCEL_CHECK_INTERVAL_MS: u64 = 100;

/// Minimum user-configurable feed poll interval (ms).
pub const MIN_FEED_POLL_INTERVAL_MS: u64 = 100;

/// Maximum user-configurable feed poll interval (ms).
pub const MAX_FEED_POLL_INTERVAL_MS: u64 = 10_000;

/// Maximum bytes read from the event file in one poll tick.
pub const MAX_FEED_READ_BYTES_PER_TICK: usize = 256 * 1_024; // 256 KiB

/// Maximum size of the carried-over partial line before it is discarded.
pub const MAX_FEED_PARTIAL_BYTES: usize = MAX_FEED_READ_BYTES_PER_TICK * 4; // 1 MiB

/// Maximum number of malformed lines reported individually per load.
/// Further malformed lines are only counted.
pub const MAX_FEED_LINE_WARNINGS: usize = 50;

/// Maximum number of feed messages processed per UI frame.
pub const MAX_FEED_MESSAGES_PER_FRAME: usize = 200;

/// Maximum number of warnings kept for the status bar.
pub const MAX_WARNINGS: usize = 200;

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
