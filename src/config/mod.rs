//! Configuration module for the nested zones application.

pub mod analysis;
pub mod binance;

mod debug; // Private: files use crate::config::DEBUG_FLAGS not crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod plot;

// Re-export commonly used items
pub use analysis::{ZONES, ZoneParams};
pub use binance::BINANCE;
pub use plot::PLOT;
