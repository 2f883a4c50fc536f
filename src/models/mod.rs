// Domain models produced by zone analysis
// These modules contain pure data independent of fetching/rendering

pub mod level;
pub mod zone;

// Re-export key types for convenience
pub use level::Level;
pub use zone::{NestedZones, Zone};
