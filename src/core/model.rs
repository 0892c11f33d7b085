// ManaDash - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Mana events
// =============================================================================

/// Whether an event pledged mana to a node or revoked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Pledge,
    Revoke,
}

impl EventKind {
    /// Past-tense verb used in list rows.
    pub fn verb(&self) -> &'static str {
        match self {
            EventKind::Pledge => "Pledged",
            EventKind::Revoke => "Revoked",
        }
    }
}

/// The two mana vectors tracked per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManaType {
    Access,
    Consensus,
}

impl ManaType {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ManaType::Access => "access",
            ManaType::Consensus => "consensus",
        }
    }
}

impl fmt::Display for ManaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single mana pledge or revoke, as reported by a node.
///
/// Amounts are already computed upstream; the dashboard only displays them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManaEvent {
    /// Pledge or revoke.
    pub kind: EventKind,

    /// Full ID of the node the mana was pledged to or revoked from.
    pub node_id: String,

    /// Amount of mana moved by the transaction.
    pub amount: f64,

    /// Which mana vector the event affects.
    pub mana_type: ManaType,

    /// ID of the transaction that caused the event.
    pub tx_id: String,

    /// When the transaction was booked.
    pub time: DateTime<Utc>,
}

impl ManaEvent {
    /// Returns true if `filter` is empty or the node ID starts with it.
    pub fn matches_node(&self, filter: &str) -> bool {
        filter.is_empty() || self.node_id.starts_with(filter)
    }
}

/// Network-wide mana totals, shown in the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkTotals {
    pub access: f64,
    pub consensus: f64,
}

/// One line of an event file: either an event or a totals snapshot
/// (`{"totals":{"access":..,"consensus":..}}`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FeedRecord {
    Event(ManaEvent),
    Totals { totals: NetworkTotals },
}

// =============================================================================
// List rows
// =============================================================================

/// One renderable row of a list panel.
///
/// The panel treats entries as opaque: it draws `text` and, when present,
/// `detail` beneath it, and never looks inside either.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListEntry {
    /// Primary line.
    pub text: String,

    /// Secondary metadata line (transaction, timestamp, ...).
    pub detail: Option<String>,
}

impl ListEntry {
    /// A row with only a primary line.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            detail: None,
        }
    }

    /// Attach a metadata line.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<&str> for ListEntry {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Order in which the caller wants events listed.
///
/// The panel never reorders; this is consumed by the row builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListOrder {
    /// Most recent event first.
    #[default]
    NewestFirst,
    /// Oldest event first.
    Chronological,
}

impl ListOrder {
    /// Parse a config/CLI value ("newest-first" or "chronological").
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "newest-first" | "newest" => Some(ListOrder::NewestFirst),
            "chronological" | "oldest-first" => Some(ListOrder::Chronological),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListOrder::NewestFirst => "newest-first",
            ListOrder::Chronological => "chronological",
        }
    }
}

// =============================================================================
// Feed progress
// =============================================================================

/// Messages sent from the feed thread to the UI thread.
#[derive(Debug)]
pub enum FeedProgress {
    /// Initial load of the event file finished. `totals` is the last totals
    /// record seen, if any.
    Loaded {
        events: Vec<ManaEvent>,
        totals: Option<NetworkTotals>,
    },

    /// Lines appended to a followed file since the last poll.
    NewEvents {
        events: Vec<ManaEvent>,
        totals: Option<NetworkTotals>,
    },

    /// Non-fatal problem (malformed line, transient read error).
    Warning { message: String },

    /// The feed could not start.
    Failed { error: String },

    /// The feed thread exited after cancellation.
    Stopped,
}
