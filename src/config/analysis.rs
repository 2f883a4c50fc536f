//! Zone detection configuration

/// Tuning knobs for base-candle detection and the touch filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneParams {
    /// Neighbourhood radius: how many candles either side are summed when judging a candidate.
    pub window: usize,
    /// A candle is a base candle when its momentum is strictly below
    /// `ratio_threshold * (|before| + |after|)`.
    pub ratio_threshold: f64,
    /// Zones touched by more than this many later candles are "broken" and discarded.
    pub max_touch: u32,
    /// Stop counting touches once a zone is already broken.
    /// Only affects speed, never which zones are kept.
    pub early_exit: bool,
}

impl ZoneParams {
    /// Smallest candle sequence that yields at least one scanned index.
    pub fn min_candles(&self) -> usize {
        self.window.saturating_mul(2).saturating_add(1)
    }
}

impl Default for ZoneParams {
    fn default() -> Self {
        ZONES
    }
}

pub const ZONES: ZoneParams = ZoneParams {
    window: 3,
    ratio_threshold: 1.0 / 20.0,
    max_touch: 4,
    early_exit: true,
};
