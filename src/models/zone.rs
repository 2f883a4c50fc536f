use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A price range anchored at one base candle.
/// Produced by the zone detector and read-only from then on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Open time of the base candle
    pub anchor_time: DateTime<Utc>,
    pub top: f64,
    pub bottom: f64,
    /// Later candles in the same sequence whose range overlaps this zone
    pub touch_count: u32,
}

impl Zone {
    /// True if `self` lies entirely inside `parent` (edges may coincide).
    pub fn is_within(&self, parent: &Zone) -> bool {
        self.top <= parent.top && self.bottom >= parent.bottom
    }

    /// Identity used when removing exact duplicates.
    pub(crate) fn dedup_key(&self) -> (DateTime<Utc>, u64, u64, u32) {
        (
            self.anchor_time,
            self.top.to_bits(),
            self.bottom.to_bits(),
            self.touch_count,
        )
    }
}

/// Zones that survived nesting, one list per timeframe role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NestedZones {
    /// Every High zone; nothing sits above it
    pub high: Vec<Zone>,
    /// Intermediate zones contained in some High zone
    pub intermediate: Vec<Zone>,
    /// Low zones contained in some accepted Intermediate zone
    pub low: Vec<Zone>,
}

impl NestedZones {
    pub fn total(&self) -> usize {
        self.high.len() + self.intermediate.len() + self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
