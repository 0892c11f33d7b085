// ManaDash - app/mod.rs
//
// Application layer: mounted panels, dashboard state, event feed.
// Dependencies: core layer.
// Must NOT depend on: ui, platform specifics.

pub mod feed;
pub mod panel;
pub mod state;
