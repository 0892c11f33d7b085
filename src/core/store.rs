// ManaDash - core/store.rs
//
// Observable store backing the list panels.
//
// The store is shared as `Rc<ManaStore>` and lives on the UI thread. Views
// subscribe to the fields they read and are notified once per mutation of
// any of those fields. Reads go through a `StoreReader` which records the
// fields it touched, so a view can subscribe to exactly what its last render
// depended on.
//
// Listeners are invoked after every internal borrow has been released, so a
// listener may read the store or drop its own subscription.

use crate::core::model::{EventKind, ManaEvent, NetworkTotals};
use crate::util::constants;
use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

// =============================================================================
// Fields
// =============================================================================

/// An observable field of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreField {
    PledgeEvents,
    RevokeEvents,
    NodeFilter,
    NetworkTotals,
}

impl StoreField {
    /// Returns all fields in declaration order.
    pub fn all() -> &'static [StoreField] {
        &[
            StoreField::PledgeEvents,
            StoreField::RevokeEvents,
            StoreField::NodeFilter,
            StoreField::NetworkTotals,
        ]
    }

    /// The event list holding events of `kind`.
    pub fn events_of(kind: EventKind) -> Self {
        match kind {
            EventKind::Pledge => StoreField::PledgeEvents,
            EventKind::Revoke => StoreField::RevokeEvents,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// A small copyable set of store fields.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FieldSet(u8);

impl FieldSet {
    pub const EMPTY: FieldSet = FieldSet(0);

    pub fn of(fields: &[StoreField]) -> Self {
        let mut set = Self::EMPTY;
        for field in fields {
            set.insert(*field);
        }
        set
    }

    pub fn insert(&mut self, field: StoreField) {
        self.0 |= field.bit();
    }

    pub fn contains(&self, field: StoreField) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = StoreField> + '_ {
        StoreField::all()
            .iter()
            .copied()
            .filter(move |f| self.contains(*f))
    }
}

impl From<StoreField> for FieldSet {
    fn from(field: StoreField) -> Self {
        Self(field.bit())
    }
}

impl fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Default)]
struct StoreState {
    pledge_events: VecDeque<ManaEvent>,
    revoke_events: VecDeque<ManaEvent>,
    node_filter: String,
    network_totals: NetworkTotals,
}

impl StoreState {
    fn events_mut(&mut self, kind: EventKind) -> &mut VecDeque<ManaEvent> {
        match kind {
            EventKind::Pledge => &mut self.pledge_events,
            EventKind::Revoke => &mut self.revoke_events,
        }
    }
}

type Listener = Rc<dyn Fn(StoreField)>;

struct ListenerSlot {
    id: u64,
    fields: FieldSet,
    callback: Listener,
}

/// Shared observable store of mana pledge and revoke events.
///
/// Each event list is bounded to `max_events`; pushing beyond the bound
/// evicts the oldest event.
pub struct ManaStore {
    state: RefCell<StoreState>,
    listeners: RefCell<Vec<ListenerSlot>>,
    next_listener_id: Cell<u64>,
    max_events: usize,
}

impl ManaStore {
    /// Create an empty store with the given per-list history bound.
    ///
    /// `max_events` is clamped to `MIN_MAX_EVENTS..=ABSOLUTE_MAX_EVENTS`.
    pub fn new(max_events: usize) -> Rc<Self> {
        let max_events =
            max_events.clamp(constants::MIN_MAX_EVENTS, constants::ABSOLUTE_MAX_EVENTS);
        Rc::new(Self {
            state: RefCell::new(StoreState::default()),
            listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(0),
            max_events,
        })
    }

    pub fn max_events(&self) -> usize {
        self.max_events
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Run `f` against a reader and return its result together with the set
    /// of fields it read.
    ///
    /// The store must not be mutated from inside `f`.
    pub fn track<R>(&self, f: impl FnOnce(&StoreReader<'_>) -> R) -> (R, FieldSet) {
        let reader = StoreReader {
            state: self.state.borrow(),
            accessed: Cell::new(FieldSet::EMPTY),
        };
        let result = f(&reader);
        (result, reader.accessed())
    }

    /// Untracked read, for consumers that do not re-render on change.
    pub fn read<R>(&self, f: impl FnOnce(&StoreReader<'_>) -> R) -> R {
        self.track(f).0
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Append a pledge event.
    pub fn push_pledge(&self, event: ManaEvent) {
        debug_assert_eq!(event.kind, EventKind::Pledge);
        self.extend(std::iter::once(event));
    }

    /// Append a revoke event.
    pub fn push_revoke(&self, event: ManaEvent) {
        debug_assert_eq!(event.kind, EventKind::Revoke);
        self.extend(std::iter::once(event));
    }

    /// Append a batch of events, routing each by its kind.
    ///
    /// Each affected list notifies its subscribers once per call.
    pub fn extend(&self, events: impl IntoIterator<Item = ManaEvent>) {
        let mut changed = FieldSet::EMPTY;
        let mut evicted = 0usize;
        {
            let mut state = self.state.borrow_mut();
            for event in events {
                let kind = event.kind;
                let list = state.events_mut(kind);
                list.push_back(event);
                while list.len() > self.max_events {
                    list.pop_front();
                    evicted += 1;
                }
                changed.insert(StoreField::events_of(kind));
            }
        }
        if evicted > 0 {
            tracing::trace!(evicted, max = self.max_events, "Store: evicted oldest events");
        }
        self.notify(changed);
    }

    /// Set the node-ID prefix that narrows both event lists.
    ///
    /// Setting the current value again is not a change.
    pub fn set_node_filter(&self, filter: &str) {
        {
            let mut state = self.state.borrow_mut();
            if state.node_filter == filter {
                return;
            }
            state.node_filter = filter.to_string();
        }
        tracing::debug!(filter, "Store: node filter changed");
        self.notify(StoreField::NodeFilter.into());
    }

    /// Replace the network-wide totals.
    pub fn set_network_totals(&self, totals: NetworkTotals) {
        {
            let mut state = self.state.borrow_mut();
            if state.network_totals == totals {
                return;
            }
            state.network_totals = totals;
        }
        self.notify(StoreField::NetworkTotals.into());
    }

    /// Drop all events and reset the totals. The node filter is kept.
    pub fn clear(&self) {
        let mut changed = FieldSet::EMPTY;
        {
            let mut state = self.state.borrow_mut();
            if !state.pledge_events.is_empty() {
                state.pledge_events.clear();
                changed.insert(StoreField::PledgeEvents);
            }
            if !state.revoke_events.is_empty() {
                state.revoke_events.clear();
                changed.insert(StoreField::RevokeEvents);
            }
            if state.network_totals != NetworkTotals::default() {
                state.network_totals = NetworkTotals::default();
                changed.insert(StoreField::NetworkTotals);
            }
        }
        self.notify(changed);
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Register `listener` for changes to any of `fields`.
    ///
    /// The listener stays registered until the returned guard is dropped.
    pub fn subscribe(
        self: &Rc<Self>,
        fields: FieldSet,
        listener: impl Fn(StoreField) + 'static,
    ) -> Subscription {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id + 1);
        self.listeners.borrow_mut().push(ListenerSlot {
            id,
            fields,
            callback: Rc::new(listener),
        });
        tracing::debug!(listener = id, ?fields, "Store: listener subscribed");
        Subscription {
            store: Rc::downgrade(self),
            id,
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn set_listener_fields(&self, id: u64, fields: FieldSet) {
        if let Some(slot) = self.listeners.borrow_mut().iter_mut().find(|s| s.id == id) {
            slot.fields = fields;
        }
    }

    fn unsubscribe(&self, id: u64) {
        self.listeners.borrow_mut().retain(|s| s.id != id);
        tracing::debug!(listener = id, "Store: listener unsubscribed");
    }

    fn is_subscribed(&self, id: u64) -> bool {
        self.listeners.borrow().iter().any(|s| s.id == id)
    }

    fn notify(&self, changed: FieldSet) {
        if changed.is_empty() {
            return;
        }
        // One snapshot per mutation, so listeners run without the listener
        // list borrowed. A listener unsubscribed by an earlier callback is
        // skipped.
        let targets: Vec<(u64, FieldSet, Listener)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|s| s.fields.iter().any(|f| changed.contains(f)))
            .map(|s| (s.id, s.fields, Rc::clone(&s.callback)))
            .collect();
        for field in changed.iter() {
            tracing::trace!(?field, listeners = targets.len(), "Store: notifying");
            for (id, fields, callback) in &targets {
                if fields.contains(field) && self.is_subscribed(*id) {
                    callback(field);
                }
            }
        }
    }
}

impl fmt::Debug for ManaStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManaStore")
            .field("state", &self.state)
            .field("listeners", &self.listener_count())
            .field("max_events", &self.max_events)
            .finish()
    }
}

// =============================================================================
// Reader
// =============================================================================

/// Read access to the store that records which fields were touched.
pub struct StoreReader<'a> {
    state: Ref<'a, StoreState>,
    accessed: Cell<FieldSet>,
}

impl StoreReader<'_> {
    /// Pledge events, oldest first.
    pub fn pledge_events(&self) -> &VecDeque<ManaEvent> {
        self.events(EventKind::Pledge)
    }

    /// Revoke events, oldest first.
    pub fn revoke_events(&self) -> &VecDeque<ManaEvent> {
        self.events(EventKind::Revoke)
    }

    /// Events of `kind`, oldest first.
    pub fn events(&self, kind: EventKind) -> &VecDeque<ManaEvent> {
        self.mark(StoreField::events_of(kind));
        match kind {
            EventKind::Pledge => &self.state.pledge_events,
            EventKind::Revoke => &self.state.revoke_events,
        }
    }

    pub fn node_filter(&self) -> &str {
        self.mark(StoreField::NodeFilter);
        &self.state.node_filter
    }

    pub fn network_totals(&self) -> NetworkTotals {
        self.mark(StoreField::NetworkTotals);
        self.state.network_totals
    }

    /// Fields read so far.
    pub fn accessed(&self) -> FieldSet {
        self.accessed.get()
    }

    fn mark(&self, field: StoreField) {
        let mut set = self.accessed.get();
        set.insert(field);
        self.accessed.set(set);
    }
}

// =============================================================================
// Subscription guard
// =============================================================================

/// Keeps a store listener registered. Dropping it unregisters the listener.
///
/// Holds only a weak reference, so it never keeps the store alive.
#[must_use = "dropping a Subscription unregisters its listener immediately"]
#[derive(Debug)]
pub struct Subscription {
    store: Weak<ManaStore>,
    id: u64,
}

impl Subscription {
    /// Change the set of fields this listener is notified about.
    pub fn set_fields(&self, fields: FieldSet) {
        if let Some(store) = self.store.upgrade() {
            store.set_listener_fields(self.id, fields);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.unsubscribe(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ManaType;
    use chrono::{TimeZone, Utc};

    fn make_event(kind: EventKind, n: u32) -> ManaEvent {
        ManaEvent {
            kind,
            node_id: format!("node{n}"),
            amount: f64::from(n),
            mana_type: ManaType::Access,
            tx_id: format!("tx{n}"),
            time: Utc.timestamp_opt(1_700_000_000 + i64::from(n), 0).unwrap(),
        }
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn(StoreField) + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        (count, move |_| c.set(c.get() + 1))
    }

    #[test]
    fn test_field_set_membership() {
        let set = FieldSet::of(&[StoreField::PledgeEvents, StoreField::NodeFilter]);
        assert!(set.contains(StoreField::PledgeEvents));
        assert!(set.contains(StoreField::NodeFilter));
        assert!(!set.contains(StoreField::RevokeEvents));
        assert_eq!(set.iter().count(), 2);
        assert!(FieldSet::EMPTY.is_empty());
    }

    #[test]
    fn test_observed_change_notifies_once() {
        let store = ManaStore::new(10);
        let (count, listener) = counter();
        let _sub = store.subscribe(StoreField::PledgeEvents.into(), listener);

        store.push_pledge(make_event(EventKind::Pledge, 1));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_unobserved_change_does_not_notify() {
        let store = ManaStore::new(10);
        let (count, listener) = counter();
        let _sub = store.subscribe(StoreField::PledgeEvents.into(), listener);

        store.push_revoke(make_event(EventKind::Revoke, 1));
        store.set_network_totals(NetworkTotals {
            access: 1.0,
            consensus: 2.0,
        });
        store.set_node_filter("abc");
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_batch_extend_notifies_once_per_field() {
        let store = ManaStore::new(10);
        let (count, listener) = counter();
        let _sub = store.subscribe(
            FieldSet::of(&[StoreField::PledgeEvents, StoreField::RevokeEvents]),
            listener,
        );

        store.extend(vec![
            make_event(EventKind::Pledge, 1),
            make_event(EventKind::Pledge, 2),
            make_event(EventKind::Revoke, 3),
        ]);
        // One notification for pledges, one for revokes.
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_same_filter_is_not_a_change() {
        let store = ManaStore::new(10);
        let (count, listener) = counter();
        let _sub = store.subscribe(StoreField::NodeFilter.into(), listener);

        store.set_node_filter("abc");
        store.set_node_filter("abc");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let store = ManaStore::new(10);
        let (count, listener) = counter();
        let sub = store.subscribe(StoreField::PledgeEvents.into(), listener);
        assert_eq!(store.listener_count(), 1);

        drop(sub);
        assert_eq!(store.listener_count(), 0);
        store.push_pledge(make_event(EventKind::Pledge, 1));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_listener_dropped_mid_dispatch_is_not_called() {
        let store = ManaStore::new(10);
        let other: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&other);
        let _first = store.subscribe(StoreField::PledgeEvents.into(), move |_| {
            slot.borrow_mut().take();
        });
        let (count, listener) = counter();
        *other.borrow_mut() = Some(store.subscribe(StoreField::PledgeEvents.into(), listener));
        assert_eq!(store.listener_count(), 2);

        store.push_pledge(make_event(EventKind::Pledge, 1));
        assert_eq!(count.get(), 0);
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn test_subscription_outliving_store_is_harmless() {
        let store = ManaStore::new(10);
        let sub = store.subscribe(StoreField::PledgeEvents.into(), |_| {});
        drop(store);
        sub.set_fields(FieldSet::EMPTY);
        drop(sub);
    }

    #[test]
    fn test_set_fields_retargets_listener() {
        let store = ManaStore::new(10);
        let (count, listener) = counter();
        let sub = store.subscribe(StoreField::PledgeEvents.into(), listener);

        sub.set_fields(StoreField::RevokeEvents.into());
        store.push_pledge(make_event(EventKind::Pledge, 1));
        assert_eq!(count.get(), 0);
        store.push_revoke(make_event(EventKind::Revoke, 2));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_history_is_bounded_oldest_evicted() {
        let store = ManaStore::new(3);
        for n in 0..5 {
            store.push_pledge(make_event(EventKind::Pledge, n));
        }
        let nodes: Vec<String> = store.read(|r| {
            r.pledge_events()
                .iter()
                .map(|e| e.node_id.clone())
                .collect()
        });
        assert_eq!(nodes, vec!["node2", "node3", "node4"]);
    }

    #[test]
    fn test_track_records_only_fields_read() {
        let store = ManaStore::new(10);
        let (len, fields) = store.track(|r| r.revoke_events().len() + r.node_filter().len());
        assert_eq!(len, 0);
        assert_eq!(
            fields,
            FieldSet::of(&[StoreField::RevokeEvents, StoreField::NodeFilter])
        );
    }

    #[test]
    fn test_listener_may_read_store() {
        let store = ManaStore::new(10);
        let seen = Rc::new(Cell::new(0usize));
        let weak = Rc::downgrade(&store);
        let s = Rc::clone(&seen);
        let _sub = store.subscribe(StoreField::PledgeEvents.into(), move |_| {
            if let Some(store) = weak.upgrade() {
                s.set(store.read(|r| r.pledge_events().len()));
            }
        });

        store.push_pledge(make_event(EventKind::Pledge, 1));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_clear_notifies_only_non_empty_fields() {
        let store = ManaStore::new(10);
        store.push_pledge(make_event(EventKind::Pledge, 1));
        let (count, listener) = counter();
        let _sub = store.subscribe(
            FieldSet::of(&[StoreField::PledgeEvents, StoreField::RevokeEvents]),
            listener,
        );

        store.clear();
        assert_eq!(count.get(), 1);
        assert!(store.read(|r| r.pledge_events().is_empty()));
    }

    #[test]
    fn test_max_events_is_clamped() {
        assert_eq!(ManaStore::new(0).max_events(), constants::MIN_MAX_EVENTS);
        assert_eq!(
            ManaStore::new(usize::MAX).max_events(),
            constants::ABSOLUTE_MAX_EVENTS
        );
    }
}
