//! `marquee-app` library crate.
//!
//! Wires the catalog client and trending store into the search
//! coordinator and trending loader. The terminal driver lives in `main.rs`.

pub mod config;
pub mod coordinator;
pub mod state;
pub mod trending_loader;
pub mod view;

pub use config::{AppConfig, ConfigError, TrendingBackend};
pub use coordinator::{SearchCoordinator, SearchOutcome};
pub use state::{SearchState, SearchStatus};
pub use trending_loader::TrendingLoader;
