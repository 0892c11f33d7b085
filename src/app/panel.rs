// ManaDash - app/panel.rs
//
// Mounted pledge/revoke list panel: the pure `core::panel::render` plus an
// explicit store subscription.
//
// Lifecycle:
//   - `mount` registers a listener on the store. The listener marks the panel
//     stale and calls the caller's `on_invalidate` hook (the GUI passes
//     `egui::Context::request_repaint`).
//   - Each render runs the caller's builder against a tracking reader and
//     re-targets the subscription at exactly the fields that render read.
//   - Dropping the panel drops its `Subscription`, which unregisters the
//     listener.

use crate::core::model::ListEntry;
use crate::core::panel::{self, BodyStyle, PanelProps, PanelView};
use crate::core::store::{FieldSet, ManaStore, StoreReader, Subscription};
use std::cell::Cell;
use std::rc::Rc;

/// A list panel bound to a store for as long as it is alive.
pub struct PledgeRevokeListPanel {
    store: Rc<ManaStore>,
    stale: Rc<Cell<bool>>,
    observed: FieldSet,
    render_count: u64,
    view: PanelView,
    subscription: Subscription,
}

impl PledgeRevokeListPanel {
    /// Subscribe to `store` and return a panel that has not rendered yet.
    pub fn mount(store: Rc<ManaStore>, on_invalidate: impl Fn() + 'static) -> Self {
        let stale = Rc::new(Cell::new(true));
        let flag = Rc::clone(&stale);
        let subscription = store.subscribe(FieldSet::EMPTY, move |field| {
            tracing::trace!(?field, "Panel invalidated");
            flag.set(true);
            on_invalidate();
        });

        Self {
            store,
            stale,
            observed: FieldSet::EMPTY,
            render_count: 0,
            view: PanelView {
                title: String::new(),
                body: Vec::new(),
                style: BodyStyle::default(),
            },
            subscription,
        }
    }

    /// Render unconditionally.
    ///
    /// `build` returns the title and rows for this pass. Every store field it
    /// reads becomes a dependency of the panel until the next render.
    pub fn render_with(
        &mut self,
        build: impl FnOnce(&StoreReader<'_>) -> (String, Vec<ListEntry>),
    ) -> &PanelView {
        let ((title, items), deps) = self.store.track(build);
        if deps != self.observed {
            tracing::debug!(?deps, title = %title, "Panel dependencies changed");
            self.subscription.set_fields(deps);
            self.observed = deps;
        }

        let props = PanelProps {
            title,
            items,
            data_source: Rc::clone(&self.store),
        };
        self.view = panel::render(&props);
        self.stale.set(false);
        self.render_count += 1;
        &self.view
    }

    /// Render only if an observed field changed since the last render,
    /// otherwise return the previous view.
    pub fn view(
        &mut self,
        build: impl FnOnce(&StoreReader<'_>) -> (String, Vec<ListEntry>),
    ) -> &PanelView {
        if self.stale.get() {
            self.render_with(build);
        }
        &self.view
    }

    /// Whether an observed field changed since the last render.
    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }

    /// Fields the last render read.
    pub fn observed(&self) -> FieldSet {
        self.observed
    }

    /// Number of renders performed since mount.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{EventKind, ListOrder, ManaEvent, ManaType, NetworkTotals};
    use crate::core::rows::event_rows;
    use crate::core::store::StoreField;
    use chrono::Utc;

    fn make_event(kind: EventKind, node_id: &str) -> ManaEvent {
        ManaEvent {
            kind,
            node_id: node_id.to_string(),
            amount: 3.0,
            mana_type: ManaType::Access,
            tx_id: "tx".to_string(),
            time: Utc::now(),
        }
    }

    fn mount_counted(store: &Rc<ManaStore>) -> (PledgeRevokeListPanel, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let panel = PledgeRevokeListPanel::mount(Rc::clone(store), move || c.set(c.get() + 1));
        (panel, count)
    }

    fn pledged(r: &StoreReader<'_>) -> (String, Vec<ListEntry>) {
        (
            "Pledged".to_string(),
            event_rows(r, EventKind::Pledge, ListOrder::Chronological),
        )
    }

    #[test]
    fn test_mount_registers_and_drop_releases() {
        let store = ManaStore::new(10);
        let (panel, _) = mount_counted(&store);
        assert_eq!(store.listener_count(), 1);
        drop(panel);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_observed_mutation_invalidates_exactly_once() {
        let store = ManaStore::new(10);
        let (mut panel, count) = mount_counted(&store);
        panel.render_with(pledged);
        assert!(!panel.is_stale());

        store.push_pledge(make_event(EventKind::Pledge, "n1"));
        assert_eq!(count.get(), 1);
        assert!(panel.is_stale());

        let view = panel.view(pledged);
        assert_eq!(view.body.len(), 1);
        assert_eq!(panel.render_count(), 2);
    }

    #[test]
    fn test_unobserved_mutation_does_not_invalidate() {
        let store = ManaStore::new(10);
        let (mut panel, count) = mount_counted(&store);
        panel.render_with(pledged);

        store.push_revoke(make_event(EventKind::Revoke, "n1"));
        store.set_network_totals(NetworkTotals {
            access: 5.0,
            consensus: 5.0,
        });
        assert_eq!(count.get(), 0);
        assert!(!panel.is_stale());

        panel.view(pledged);
        assert_eq!(panel.render_count(), 1);
    }

    #[test]
    fn test_dependencies_follow_what_was_read() {
        let store = ManaStore::new(10);
        let (mut panel, _) = mount_counted(&store);
        panel.render_with(pledged);
        assert_eq!(
            panel.observed(),
            FieldSet::of(&[StoreField::PledgeEvents, StoreField::NodeFilter])
        );

        panel.render_with(|_| ("Static".to_string(), vec![ListEntry::new("fixed")]));
        assert!(panel.observed().is_empty());
    }

    #[test]
    fn test_unchanged_store_renders_identically() {
        let store = ManaStore::new(10);
        store.push_pledge(make_event(EventKind::Pledge, "n1"));
        let (mut panel, _) = mount_counted(&store);

        let first = panel.render_with(pledged).clone();
        let second = panel.render_with(pledged).clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_view_renders_even_without_changes() {
        let store = ManaStore::new(10);
        let (mut panel, _) = mount_counted(&store);
        let view = panel.view(|_| ("Revoked".to_string(), Vec::new()));
        assert_eq!(view.title, "Revoked");
        assert!(view.is_empty());
    }
}
