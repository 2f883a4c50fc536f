use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::BINANCE;
use crate::data::raw_kline::RawKline;
use crate::domain::Timeframe;
use crate::utils::time_utils;

/// Everything a kline source needs for one symbol/timeframe window.
#[derive(Debug, Clone, PartialEq)]
pub struct KlineRequest {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub limit: i32,
}

impl KlineRequest {
    /// The standard request: a window of `lookback_intervals` candles ending at `end_time`.
    pub fn lookback(symbol: &str, timeframe: Timeframe, end_time: DateTime<Utc>) -> Result<Self> {
        let intervals = BINANCE.limits.lookback_intervals;
        let start_time = timeframe.lookback_start(end_time, intervals).ok_or_else(|| {
            anyhow!(
                "{} candles of {} before {} fall outside the supported date range",
                intervals,
                timeframe,
                time_utils::format_utc(&end_time)
            )
        })?;
        Ok(KlineRequest {
            symbol: symbol.to_string(),
            timeframe,
            start_time,
            end_time,
            limit: BINANCE.limits.klines_limit,
        })
    }
}

impl std::fmt::Display for KlineRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} {} from {} to {} (limit {})",
            self.symbol,
            self.timeframe,
            time_utils::format_utc(&self.start_time),
            time_utils::format_utc(&self.end_time),
            self.limit
        )
    }
}

/// Market data collaborator. Implementations are constructed explicitly and passed in,
/// so the pipeline can run against a fake in tests.
#[async_trait]
pub trait KlineSource: Send + Sync {
    /// Up to `request.limit` raw rows, oldest first. Either rows OR an anyhow::Error.
    async fn fetch_klines(&self, request: &KlineRequest) -> Result<Vec<RawKline>>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}
