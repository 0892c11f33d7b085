// ManaDash - ui/panels/mod.rs

pub mod about;
pub mod mana_events;
pub mod pledge_revoke_list;
pub mod warnings;
