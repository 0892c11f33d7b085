// ManaDash - app/state.rs
//
// Application state: the shared store, the two mounted list panels, and the
// status/warning bookkeeping shown around them.
// Owned by the eframe::App implementation.

use crate::app::panel::PledgeRevokeListPanel;
use crate::core::model::{EventKind, FeedProgress, ListEntry, ListOrder};
use crate::core::rows::event_rows;
use crate::core::store::{ManaStore, StoreReader};
use crate::util::constants::{self, MAX_WARNINGS};
use std::rc::Rc;

/// Top-level application state.
pub struct DashboardState {
    /// Shared store. Parents and panels hold clones of this `Rc`.
    pub store: Rc<ManaStore>,

    /// List of pledge events.
    pub pledged: PledgeRevokeListPanel,

    /// List of revoke events.
    pub revoked: PledgeRevokeListPanel,

    /// Order in which both lists present events.
    pub order: ListOrder,

    /// Text of the node filter box. Pushed into the store when edited.
    pub node_filter_input: String,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings (config, feed).
    pub warnings: Vec<String>,

    /// Whether the warnings window is open.
    pub show_warnings: bool,

    /// Whether the About window is open.
    pub show_about: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl DashboardState {
    /// Create the state and mount both panels on `store`.
    ///
    /// `on_invalidate` is called whenever either panel's observed data changes.
    pub fn new(
        store: Rc<ManaStore>,
        order: ListOrder,
        debug_mode: bool,
        on_invalidate: impl Fn() + Clone + 'static,
    ) -> Self {
        let pledged = PledgeRevokeListPanel::mount(Rc::clone(&store), on_invalidate.clone());
        let revoked = PledgeRevokeListPanel::mount(Rc::clone(&store), on_invalidate);
        Self {
            store,
            pledged,
            revoked,
            order,
            node_filter_input: String::new(),
            status_message: "Ready. Open an event file to begin.".to_string(),
            warnings: Vec::new(),
            show_warnings: false,
            show_about: false,
            debug_mode,
        }
    }

    /// Builder for the pledge panel's title and rows.
    pub fn pledged_props(&self) -> impl Fn(&StoreReader<'_>) -> (String, Vec<ListEntry>) {
        let order = self.order;
        move |r| {
            (
                constants::PLEDGED_TITLE.to_string(),
                event_rows(r, EventKind::Pledge, order),
            )
        }
    }

    /// Builder for the revoke panel's title and rows.
    pub fn revoked_props(&self) -> impl Fn(&StoreReader<'_>) -> (String, Vec<ListEntry>) {
        let order = self.order;
        move |r| {
            (
                constants::REVOKED_TITLE.to_string(),
                event_rows(r, EventKind::Revoke, order),
            )
        }
    }

    /// Switch list order and re-render both panels with it.
    pub fn set_order(&mut self, order: ListOrder) {
        if self.order == order {
            return;
        }
        self.order = order;
        let pledged = self.pledged_props();
        let revoked = self.revoked_props();
        self.pledged.render_with(pledged);
        self.revoked.render_with(revoked);
        tracing::debug!(order = order.label(), "List order changed");
    }

    /// Push the filter box contents into the store.
    pub fn apply_node_filter(&mut self) {
        let trimmed: String = self
            .node_filter_input
            .trim()
            .chars()
            .take(constants::MAX_NODE_FILTER_LEN)
            .collect();
        self.store.set_node_filter(&trimmed);
    }

    /// Apply one message from the feed thread.
    pub fn apply_feed_progress(&mut self, msg: FeedProgress) {
        match msg {
            FeedProgress::Loaded { events, totals } => {
                let count = events.len();
                self.store.extend(events);
                if let Some(totals) = totals {
                    self.store.set_network_totals(totals);
                }
                self.status_message = format!("Loaded {count} events.");
            }
            FeedProgress::NewEvents { events, totals } => {
                let count = events.len();
                self.store.extend(events);
                if let Some(totals) = totals {
                    self.store.set_network_totals(totals);
                }
                self.status_message = format!("{count} new events.");
            }
            FeedProgress::Warning { message } => self.push_warning(message),
            FeedProgress::Failed { error } => {
                self.status_message = format!("Event feed failed: {error}");
                self.push_warning(error);
            }
            FeedProgress::Stopped => {
                self.status_message = "Event feed stopped.".to_string();
            }
        }
    }

    /// Record a warning, dropping the oldest once `MAX_WARNINGS` is reached.
    pub fn push_warning(&mut self, message: String) {
        if self.warnings.len() >= MAX_WARNINGS {
            self.warnings.remove(0);
        }
        self.warnings.push(message);
    }

    /// Drop all events. Panels invalidate through the store.
    pub fn clear(&mut self) {
        self.store.clear();
        self.warnings.clear();
        self.status_message = "Cleared.".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ManaEvent, ManaType};
    use chrono::Utc;
    use std::cell::Cell;

    fn make_event(kind: EventKind, node_id: &str) -> ManaEvent {
        ManaEvent {
            kind,
            node_id: node_id.to_string(),
            amount: 1.0,
            mana_type: ManaType::Access,
            tx_id: "tx".to_string(),
            time: Utc::now(),
        }
    }

    fn make_state() -> (DashboardState, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let state = DashboardState::new(ManaStore::new(10), ListOrder::NewestFirst, false, move || {
            c.set(c.get() + 1)
        });
        (state, count)
    }

    fn render_both(state: &mut DashboardState) {
        let pledged = state.pledged_props();
        let revoked = state.revoked_props();
        state.pledged.render_with(pledged);
        state.revoked.render_with(revoked);
    }

    #[test]
    fn test_feed_events_reach_the_right_panel() {
        let (mut state, _) = make_state();
        render_both(&mut state);

        state.apply_feed_progress(FeedProgress::Loaded {
            events: vec![make_event(EventKind::Revoke, "n1")],
            totals: None,
        });
        assert!(!state.pledged.is_stale());
        assert!(state.revoked.is_stale());

        let props = state.revoked_props();
        let view = state.revoked.view(props);
        assert_eq!(view.title, "Revoked");
        assert_eq!(view.body.len(), 1);
    }

    #[test]
    fn test_node_filter_invalidates_both_panels() {
        let (mut state, count) = make_state();
        render_both(&mut state);

        state.node_filter_input = "  abc  ".to_string();
        state.apply_node_filter();
        assert_eq!(count.get(), 2);
        assert_eq!(state.store.read(|r| r.node_filter().to_string()), "abc");
    }

    #[test]
    fn test_warnings_are_bounded() {
        let (mut state, _) = make_state();
        for n in 0..(MAX_WARNINGS + 3) {
            state.push_warning(format!("w{n}"));
        }
        assert_eq!(state.warnings.len(), MAX_WARNINGS);
        assert_eq!(state.warnings[0], "w3");
    }

    #[test]
    fn test_failed_feed_sets_status() {
        let (mut state, _) = make_state();
        state.apply_feed_progress(FeedProgress::Failed {
            error: "boom".to_string(),
        });
        assert!(state.status_message.contains("boom"));
        assert_eq!(state.warnings, vec!["boom".to_string()]);
    }

    #[test]
    fn test_set_order_rerenders_with_new_order() {
        let (mut state, _) = make_state();
        state.store.extend(vec![
            make_event(EventKind::Pledge, "old"),
            make_event(EventKind::Pledge, "new"),
        ]);
        state.set_order(ListOrder::Chronological);
        let props = state.pledged_props();
        let view = state.pledged.view(props);
        assert!(view.body[0].text.ends_with("old"));
    }
}
