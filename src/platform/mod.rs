// ManaDash - platform/mod.rs
//
// Platform abstraction layer: directory resolution and config.toml.
// Dependencies: directories, toml, core model types.
// Must NOT depend on: app, ui.

pub mod config;
