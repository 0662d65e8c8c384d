//! UI-facing search state.

use marquee_core::Movie;

/// Phase of the search state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A catalog request is in flight.
    Loading,
    /// The latest request returned a (possibly empty) list.
    Success,
    /// The latest request failed; `error_message` explains why.
    Error,
}

/// Snapshot published by the coordinator after every transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub status: SearchStatus,
    /// Normalized query of the latest request; empty in browse mode.
    pub query: String,
    pub movies: Vec<Movie>,
    pub error_message: Option<String>,
    pub is_fetching: bool,
}

impl SearchState {
    /// Whether the list shows the popular listing rather than search hits.
    pub fn is_browse(&self) -> bool {
        self.query.is_empty()
    }
}
