use crate::config::{DEBUG_FLAGS, ZoneParams};
use crate::domain::Candle;
use crate::models::Zone;

/// Finds untested consolidation zones in a single timeframe's candles.
///
/// 1. Scans every index with a full `window` of neighbours on both sides.
/// 2. Marks a **base candle** when its momentum is strictly below
///    `ratio_threshold * (|sum before| + |sum after|)`.
/// 3. Turns each base candle into a zone spanning its low..high.
/// 4. Counts later candles overlapping the zone and drops zones touched more than `max_touch` times.
#[derive(Debug, Clone, Default)]
pub struct ZoneDetector {
    params: ZoneParams,
}

impl ZoneDetector {
    pub fn new(params: ZoneParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ZoneParams {
        &self.params
    }

    /// Base-candle test for `idx`. Caller guarantees `window <= idx < len - window`.
    fn is_base_candle(&self, candles: &[Candle], idx: usize) -> bool {
        let window = self.params.window;
        // Momenta are summed with their sign before taking magnitudes
        let before: f64 = candles[idx - window..idx].iter().map(|c| c.momentum).sum();
        let after: f64 = candles[idx + 1..=idx + window]
            .iter()
            .map(|c| c.momentum)
            .sum();
        let threshold = self.params.ratio_threshold * (before.abs() + after.abs());
        let is_base = candles[idx].momentum.abs() < threshold;

        #[cfg(debug_assertions)]
        if is_base && DEBUG_FLAGS.print_base_candles {
            log::info!(
                "Base candle at {} (momentum {:.6} < threshold {:.6})",
                idx,
                candles[idx].momentum,
                threshold
            );
        }
        is_base
    }

    /// Indices of every base candle, ascending. Empty when there are fewer than `2 * window + 1` candles.
    pub fn base_candle_indices(&self, candles: &[Candle]) -> Vec<usize> {
        let window = self.params.window;
        let end = candles.len().saturating_sub(window);
        (window..end)
            .filter(|&idx| self.is_base_candle(candles, idx))
            .collect()
    }

    /// Number of candles opening strictly after the zone's anchor whose range overlaps the zone.
    /// With `early_exit` the count stops at `max_touch + 1`, which is enough to reject the zone.
    pub fn count_touches(&self, zone: &Zone, candles: &[Candle]) -> u32 {
        let mut touches = 0;
        for candle in candles.iter().filter(|c| c.open_time > zone.anchor_time) {
            if candle.overlaps(zone.bottom, zone.top) {
                touches += 1;
                if self.params.early_exit && touches > self.params.max_touch {
                    break;
                }
            }
        }
        touches
    }

    /// Zones that are still untested (touched at most `max_touch` times), in anchor order.
    pub fn detect(&self, candles: &[Candle]) -> Vec<Zone> {
        if candles.len() < self.params.min_candles() {
            log::debug!(
                "Only {} candles (need {}), no zones possible",
                candles.len(),
                self.params.min_candles()
            );
            return Vec::new();
        }

        // Collect provisional zones first, then count touches on the finished list
        let provisional: Vec<Zone> = self
            .base_candle_indices(candles)
            .into_iter()
            .map(|idx| Zone {
                anchor_time: candles[idx].open_time,
                top: candles[idx].high_price,
                bottom: candles[idx].low_price,
                touch_count: 0,
            })
            .collect();
        let base_count = provisional.len();

        let zones: Vec<Zone> = provisional
            .into_iter()
            .map(|zone| Zone {
                touch_count: self.count_touches(&zone, candles),
                ..zone
            })
            .filter(|zone| {
                let keep = zone.touch_count <= self.params.max_touch;
                if !keep && DEBUG_FLAGS.print_broken_zones {
                    log::info!(
                        "Discarding broken zone {:.6}..{:.6} ({}+ touches)",
                        zone.bottom,
                        zone.top,
                        zone.touch_count
                    );
                }
                keep
            })
            .collect();

        log::debug!(
            "{} candles -> {} base candles -> {} untested zones",
            candles.len(),
            base_count,
            zones.len()
        );
        zones
    }
}
