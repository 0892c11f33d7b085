// ManaDash - tests/e2e_panel.rs
//
// End-to-end tests for the event file -> store -> rows -> panel view path.
//
// These tests read a real fixture file from disk, push the events through a
// real store, and render through mounted panels. No mocks.

use manadash::app::feed::load_events;
use manadash::app::panel::PledgeRevokeListPanel;
use manadash::app::state::DashboardState;
use manadash::core::model::{EventKind, FeedProgress, ListEntry, ListOrder};
use manadash::core::panel::{render, PanelProps};
use manadash::core::rows::event_rows;
use manadash::core::store::{ManaStore, StoreReader};
use manadash::util::error::FeedError;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

// =============================================================================
// Helpers
// =============================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn texts(entries: &[ListEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.text.as_str()).collect()
}

fn pledged(order: ListOrder) -> impl Fn(&StoreReader<'_>) -> (String, Vec<ListEntry>) {
    move |r| ("Pledged".to_string(), event_rows(r, EventKind::Pledge, order))
}

fn revoked(order: ListOrder) -> impl Fn(&StoreReader<'_>) -> (String, Vec<ListEntry>) {
    move |r| ("Revoked".to_string(), event_rows(r, EventKind::Revoke, order))
}

// =============================================================================
// Fixture loading
// =============================================================================

/// The fixture holds three pledges, one revoke, one totals record and one
/// malformed line.
#[test]
fn e2e_fixture_loads_with_one_malformed_line() {
    let parsed = load_events(&fixture("mana_events.jsonl")).unwrap();
    assert_eq!(parsed.events.len(), 4);
    assert!(parsed.totals.is_some());
    assert_eq!(parsed.malformed, 1);
    assert!(
        matches!(
            parsed.errors.as_slice(),
            [FeedError::LineParse { line_number: 5, .. }]
        ),
        "unexpected errors: {:?}",
        parsed.errors
    );
}

// =============================================================================
// Store -> panel
// =============================================================================

#[test]
fn e2e_fixture_events_render_into_both_lists() {
    let parsed = load_events(&fixture("mana_events.jsonl")).unwrap();
    let store = ManaStore::new(100);
    store.extend(parsed.events);

    let mut pledge_panel = PledgeRevokeListPanel::mount(Rc::clone(&store), || {});
    let mut revoke_panel = PledgeRevokeListPanel::mount(Rc::clone(&store), || {});

    let view = pledge_panel.render_with(pledged(ListOrder::Chronological));
    assert_eq!(view.title, "Pledged");
    assert_eq!(
        texts(&view.body),
        vec![
            "Pledged 1250.00 access mana to 2GtxMQD9",
            "Pledged 300.50 consensus mana to 2GtxMQD9",
            "Pledged 75.00 access mana to CHfU1NUf",
        ]
    );

    let view = revoke_panel.render_with(revoked(ListOrder::NewestFirst));
    assert_eq!(view.title, "Revoked");
    assert_eq!(texts(&view.body), vec!["Revoked 75.00 access mana from CHfU1NUf"]);
}

#[test]
fn e2e_pledged_scenario() {
    let store = ManaStore::new(10);
    let view = render(&PanelProps {
        title: "Pledged".to_string(),
        items: vec![ListEntry::new("EventA"), ListEntry::new("EventB")],
        data_source: Rc::clone(&store),
    });
    assert_eq!(view.title, "Pledged");
    assert_eq!(texts(&view.body), vec!["EventA", "EventB"]);
}

#[test]
fn e2e_revoked_empty_scenario() {
    let store = ManaStore::new(10);
    let view = render(&PanelProps {
        title: "Revoked".to_string(),
        items: Vec::new(),
        data_source: store,
    });
    assert_eq!(view.title, "Revoked");
    assert!(view.body.is_empty());
    assert_eq!(view.style.max_height, 150.0);
}

// =============================================================================
// Reactivity
// =============================================================================

#[test]
fn e2e_observed_change_rerenders_once_unobserved_never() {
    let store = ManaStore::new(10);
    let invalidations = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&invalidations);
    let mut panel =
        PledgeRevokeListPanel::mount(Rc::clone(&store), move || counter.set(counter.get() + 1));
    panel.render_with(pledged(ListOrder::NewestFirst));

    // Revokes are not read by the pledge list.
    let parsed = load_events(&fixture("mana_events.jsonl")).unwrap();
    let (pledges, revokes): (Vec<_>, Vec<_>) = parsed
        .events
        .into_iter()
        .partition(|e| e.kind == EventKind::Pledge);
    store.extend(revokes);
    assert_eq!(invalidations.get(), 0);
    panel.view(pledged(ListOrder::NewestFirst));
    assert_eq!(panel.render_count(), 1);

    // One batch of pledges is one change.
    store.extend(pledges);
    assert_eq!(invalidations.get(), 1);
    let view = panel.view(pledged(ListOrder::NewestFirst));
    assert_eq!(view.body.len(), 3);
    assert_eq!(panel.render_count(), 2);
}

#[test]
fn e2e_dashboard_state_applies_feed_and_tears_down() {
    let store = ManaStore::new(10);
    let mut state = DashboardState::new(Rc::clone(&store), ListOrder::NewestFirst, false, || {});
    assert_eq!(store.listener_count(), 2);

    let parsed = load_events(&fixture("mana_events.jsonl")).unwrap();
    state.apply_feed_progress(FeedProgress::Loaded {
        events: parsed.events,
        totals: parsed.totals,
    });
    assert_eq!(store.read(|r| r.network_totals().access), 1_000_000.0);

    let build = state.pledged_props();
    let view = state.pledged.view(build);
    assert_eq!(view.body.len(), 3);
    assert!(view.body[0].text.ends_with("CHfU1NUf"));

    drop(state);
    assert_eq!(store.listener_count(), 0);
}
