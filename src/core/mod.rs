// ManaDash - core/mod.rs
//
// Core logic layer: data model, observable store, row building, and the
// panel render function.
// Must NOT depend on: ui, platform, app, or any I/O.

pub mod model;
pub mod panel;
pub mod rows;
pub mod store;
