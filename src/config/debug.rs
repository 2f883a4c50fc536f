//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so runs
//! stay quiet unless someone is chasing a specific stage.

pub struct DebugFlags {
    /// Emit one line per base candle found (index, momentum, threshold).
    pub print_base_candles: bool,
    /// Emit every zone discarded by the touch filter together with its touch count.
    pub print_broken_zones: bool,
    /// Emit every finer zone rejected by the nester because nothing contains it.
    pub print_unnested_zones: bool,
    /// Emit the raw request parameters sent to the kline source.
    pub print_kline_requests: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_base_candles: false,
    print_broken_zones: false,
    print_unnested_zones: false,
    print_kline_requests: true,
};
