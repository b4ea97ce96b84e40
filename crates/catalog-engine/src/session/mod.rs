//! Interactive sessions.
//!
//! Contains the debounced live search controller and the per-product layout
//! edit session.

mod layout_edit;
mod search;

pub use layout_edit::{EditPhase, LayoutEditSession, LayoutSaveRequest, SaveOutcome, SaveStep};
pub use search::{
    InputEffect, SearchController, SearchHandle, SearchOutcome, SearchRequest, SearchSession,
    SearchSnapshot, SearchStatus,
};
