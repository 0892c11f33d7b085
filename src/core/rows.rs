// ManaDash - core/rows.rs
//
// Builds the rows shown by the pledge and revoke lists from store events.
//
// Ordering is an explicit input: events are kept oldest-first in the store
// and `ListOrder` decides how they are presented. The list panel itself
// renders rows exactly in the order produced here.

use crate::core::model::{EventKind, ListEntry, ListOrder, ManaEvent};
use crate::core::store::StoreReader;
use crate::util::constants::SHORT_ID_LEN;

/// Rows for every event of `kind` that passes the store's node filter.
///
/// Reads the event list of `kind` and the node filter, so a view built from
/// these rows re-renders when either changes.
pub fn event_rows(reader: &StoreReader<'_>, kind: EventKind, order: ListOrder) -> Vec<ListEntry> {
    let filter = reader.node_filter();
    let matching = reader
        .events(kind)
        .iter()
        .filter(|e| e.matches_node(filter));

    match order {
        ListOrder::Chronological => matching.map(event_row).collect(),
        ListOrder::NewestFirst => matching.rev().map(event_row).collect(),
    }
}

/// One row describing a single event.
pub fn event_row(event: &ManaEvent) -> ListEntry {
    let preposition = match event.kind {
        EventKind::Pledge => "to",
        EventKind::Revoke => "from",
    };
    ListEntry::new(format!(
        "{} {:.2} {} mana {preposition} {}",
        event.kind.verb(),
        event.amount,
        event.mana_type,
        short_id(&event.node_id),
    ))
    .with_detail(format!(
        "tx {} \u{00b7} {}",
        short_id(&event.tx_id),
        event.time.format("%Y-%m-%d %H:%M:%S UTC"),
    ))
}

/// First `SHORT_ID_LEN` characters of an ID.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
