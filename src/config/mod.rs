//! Presence configuration module
//! Handles defaults, the optional override file and the shared runtime cell

pub mod config;
pub mod shared;

pub use config::AppConfig;
pub use shared::{EmptyStatus, SharedConfig};
