// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use analysis::{MultiTimeframeReport, MultiTimeframeRequest, ZoneDetector, run_multi_timeframe};
pub use data::{KlineRequest, KlineSource, RawKline};
pub use domain::{Candle, Timeframe, TimeframeRole};
pub use models::{Level, NestedZones, Zone};

// CLI argument parsing
use chrono::{DateTime, Utc};
use clap::Parser;

use crate::config::{ZONES, ZoneParams};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Trading pair as Binance names it
    #[arg(long, default_value = "FILUSDT")]
    pub symbol: String,

    /// Coarsest timeframe (e.g. 1d)
    #[arg(long, default_value = "1d")]
    pub high: Timeframe,

    /// Middle timeframe (e.g. 4h)
    #[arg(long, default_value = "4h")]
    pub intermediate: Timeframe,

    /// Finest timeframe (e.g. 1h)
    #[arg(long, default_value = "1h")]
    pub low: Timeframe,

    /// End of the analysed window, RFC 3339 (defaults to now)
    #[arg(long)]
    pub end: Option<DateTime<Utc>>,

    /// Neighbourhood radius used to find base candles
    #[arg(long, default_value_t = ZONES.window)]
    pub window: usize,

    /// Base candle momentum must be below this fraction of its neighbourhood's momentum
    #[arg(long, default_value_t = ZONES.ratio_threshold)]
    pub ratio_threshold: f64,

    /// Zones touched by more later candles than this are discarded
    #[arg(long, default_value_t = ZONES.max_touch)]
    pub max_touch: u32,

    /// Count every touch instead of stopping once a zone is broken
    #[arg(long, default_value_t = false)]
    pub no_early_exit: bool,

    /// Write chart JSON here instead of stdout
    #[arg(long)]
    pub output: Option<std::path::PathBuf>,
}

impl Cli {
    pub fn zone_params(&self) -> ZoneParams {
        ZoneParams {
            window: self.window,
            ratio_threshold: self.ratio_threshold,
            max_touch: self.max_touch,
            early_exit: !self.no_early_exit,
        }
    }

    pub fn request(&self, now: DateTime<Utc>) -> MultiTimeframeRequest {
        MultiTimeframeRequest {
            symbol: self.symbol.clone(),
            high: self.high,
            intermediate: self.intermediate,
            low: self.low,
            end_time: self.end.unwrap_or(now),
        }
    }
}
