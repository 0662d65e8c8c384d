//! Domain types and input handling shared by the Marquee crates.
//!
//! - [`types`]: catalog movies and persisted trending entries.
//! - [`search`]: query normalization and search-wide constants.
//! - [`debounce`]: turns raw search-box input into settled queries.

pub mod debounce;
pub mod search;
pub mod types;

pub use debounce::SearchDebouncer;
pub use types::{Movie, MoviePage, SearchEntry};
