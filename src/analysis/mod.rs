// Zone detection, nesting and level projection
pub mod level_projector;
pub mod multi_timeframe;
pub mod zone_detector;
pub mod zone_nester;

// Re-export commonly used types
pub use level_projector::project_levels;
pub use multi_timeframe::{
    MultiTimeframeReport, MultiTimeframeRequest, TimeframeSeries, ZoneAnalysis, analyse_candles,
    run_multi_timeframe,
};
pub use zone_detector::ZoneDetector;
pub use zone_nester::{nest_within, nest_zones};
