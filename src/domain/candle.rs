use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cleaned OHLCV candle. Built once by the normaliser and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,

    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,

    pub volume: f64,
    /// Size of the candle body, `|close - open|`
    pub momentum: f64,
}

impl Candle {
    // A constructor for convenience; momentum is always derived, never supplied
    pub fn new(
        open_time: DateTime<Utc>,
        close_time: DateTime<Utc>,
        open_price: f64,
        high_price: f64,
        low_price: f64,
        close_price: f64,
        volume: f64,
    ) -> Self {
        Candle {
            open_time,
            close_time,
            open_price,
            high_price,
            low_price,
            close_price,
            volume,
            momentum: (close_price - open_price).abs(),
        }
    }

    /// True when this candle's `[low, high]` range overlaps the open interval `(bottom, top)`.
    /// A candle that only touches an edge does not count.
    pub fn overlaps(&self, bottom: f64, top: f64) -> bool {
        self.high_price > bottom && self.low_price < top
    }
}
