// ManaDash - core/panel.rs
//
// The pledge/revoke list panel as a pure function from props to a view
// description. No egui here: `ui::panels::pledge_revoke_list` draws the
// resulting `PanelView`, and `app::panel` wires it to store changes.

use crate::core::model::ListEntry;
use crate::core::store::ManaStore;
use crate::util::constants::{PANEL_FONT_SIZE, PANEL_MAX_HEIGHT};
use std::fmt;
use std::rc::Rc;

/// Inputs of one render pass, built by the parent view each time.
#[derive(Clone)]
pub struct PanelProps {
    /// Heading text.
    pub title: String,

    /// Rows in display order. May be empty.
    pub items: Vec<ListEntry>,

    /// The store the rows were derived from. Read-only for the panel.
    pub data_source: Rc<ManaStore>,
}

impl fmt::Debug for PanelProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelProps")
            .field("title", &self.title)
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

/// Vertical overflow behaviour of the list body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Scrollbar appears when content exceeds the max height.
    Auto,
}

/// Fixed presentation of the list body. Not caller-configurable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyStyle {
    pub max_height: f32,
    pub overflow_y: Overflow,
    pub font_size: f32,
}

impl Default for BodyStyle {
    fn default() -> Self {
        Self {
            max_height: PANEL_MAX_HEIGHT,
            overflow_y: Overflow::Auto,
            font_size: PANEL_FONT_SIZE,
        }
    }
}

/// What a panel renders: a card with a heading and a scrollable list body.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub title: String,
    pub body: Vec<ListEntry>,
    pub style: BodyStyle,
}

impl PanelView {
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Render `props` into a view description.
///
/// The title is always present and the body holds exactly `props.items`
/// in order. Does not touch `props.data_source`.
pub fn render(props: &PanelProps) -> PanelView {
    PanelView {
        title: props.title.clone(),
        body: props.items.clone(),
        style: BodyStyle::default(),
    }
}
