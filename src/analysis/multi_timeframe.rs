use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::level_projector::project_levels;
use crate::analysis::zone_detector::ZoneDetector;
use crate::analysis::zone_nester::nest_zones;
use crate::data::{KlineRequest, KlineSource, normalize_klines};
use crate::domain::{Candle, Timeframe, TimeframeRole};
use crate::models::{Level, NestedZones, Zone};

/// What to analyse: one symbol at three candle widths, all ending at `end_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiTimeframeRequest {
    pub symbol: String,
    pub high: Timeframe,
    pub intermediate: Timeframe,
    pub low: Timeframe,
    pub end_time: DateTime<Utc>,
}

impl MultiTimeframeRequest {
    /// Roles paired with their timeframe, coarsest first (the fetch order).
    pub fn timeframes(&self) -> [(TimeframeRole, Timeframe); 3] {
        [
            (TimeframeRole::High, self.high),
            (TimeframeRole::Intermediate, self.intermediate),
            (TimeframeRole::Low, self.low),
        ]
    }
}

/// Zones before and after nesting plus the overlay levels. Derived fresh on every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZoneAnalysis {
    /// Detector output per role, before nesting
    pub detected: NestedZones,
    pub nested: NestedZones,
    pub levels: Vec<Level>,
}

/// The cleaned candles of one timeframe, kept for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeframeSeries {
    pub role: TimeframeRole,
    pub timeframe: Timeframe,
    pub candles: Vec<Candle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiTimeframeReport {
    pub symbol: String,
    pub end_time: DateTime<Utc>,
    /// High, Intermediate, Low
    pub series: Vec<TimeframeSeries>,
    pub analysis: ZoneAnalysis,
}

/// Pure core: detect on each timeframe, nest coarse to fine, then project levels.
pub fn analyse_candles(
    high: &[Candle],
    intermediate: &[Candle],
    low: &[Candle],
    detector: &ZoneDetector,
) -> ZoneAnalysis {
    let detected = NestedZones {
        high: detector.detect(high),
        intermediate: detector.detect(intermediate),
        low: detector.detect(low),
    };
    let nested = nest_zones(&detected.high, &detected.intermediate, &detected.low);
    let levels = project_levels(&nested);

    log::info!(
        "Zones detected (high/intermediate/low): {}/{}/{}, nested: {}/{}/{}, levels: {}",
        detected.high.len(),
        detected.intermediate.len(),
        detected.low.len(),
        nested.high.len(),
        nested.intermediate.len(),
        nested.low.len(),
        levels.len()
    );

    ZoneAnalysis {
        detected,
        nested,
        levels,
    }
}

async fn fetch_series(
    source: &dyn KlineSource,
    symbol: &str,
    role: TimeframeRole,
    timeframe: Timeframe,
    end_time: DateTime<Utc>,
) -> Result<TimeframeSeries> {
    let request = KlineRequest::lookback(symbol, timeframe, end_time)
        .with_context(|| format!("{} timeframe {} cannot be requested", role, timeframe))?;
    let rows = source
        .fetch_klines(&request)
        .await
        .with_context(|| format!("{} ({}) fetch failed: {}", role, source.signature(), request))?;
    let candles = normalize_klines(&rows)
        .with_context(|| format!("{} timeframe {} could not be normalised", role, timeframe))?;

    log::info!("{} {}: {} candles", role, timeframe, candles.len());
    Ok(TimeframeSeries {
        role,
        timeframe,
        candles,
    })
}

/// Fetches the three timeframes one after another and analyses them.
/// Any fetch or parse failure aborts the whole run; there is no partial result.
pub async fn run_multi_timeframe(
    source: &dyn KlineSource,
    request: &MultiTimeframeRequest,
    detector: &ZoneDetector,
) -> Result<MultiTimeframeReport> {
    let mut series = Vec::with_capacity(3);
    for (role, timeframe) in request.timeframes() {
        series.push(fetch_series(source, &request.symbol, role, timeframe, request.end_time).await?);
    }

    let analysis = analyse_candles(
        &series[0].candles,
        &series[1].candles,
        &series[2].candles,
        detector,
    );

    Ok(MultiTimeframeReport {
        symbol: request.symbol.clone(),
        end_time: request.end_time,
        series,
        analysis,
    })
}

impl MultiTimeframeReport {
    pub fn series_for(&self, role: TimeframeRole) -> Option<&TimeframeSeries> {
        self.series.iter().find(|s| s.role == role)
    }

    pub fn zones_for(&self, role: TimeframeRole) -> &[Zone] {
        match role {
            TimeframeRole::High => &self.analysis.nested.high,
            TimeframeRole::Intermediate => &self.analysis.nested.intermediate,
            TimeframeRole::Low => &self.analysis.nested.low,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::{KlineField, RawKline};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned rows per timeframe and records the requests it saw.
    pub(crate) struct FakeSource {
        pub rows: HashMap<String, Vec<RawKline>>,
        pub seen: Mutex<Vec<KlineRequest>>,
    }

    impl FakeSource {
        pub(crate) fn new(rows: HashMap<String, Vec<RawKline>>) -> Self {
            FakeSource {
                rows,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl KlineSource for FakeSource {
        async fn fetch_klines(&self, request: &KlineRequest) -> Result<Vec<RawKline>> {
            self.seen.lock().unwrap().push(request.clone());
            self.rows
                .get(&request.timeframe.to_string())
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no rows for {}", request.timeframe))
        }

        fn signature(&self) -> &'static str {
            "Fake"
        }
    }

    /// Rows for `ohlc`, one candle per `width_ms`, in exchange string format.
    pub(crate) fn rows(width_ms: i64, ohlc: &[(f64, f64, f64, f64)]) -> Vec<RawKline> {
        let start = 1_640_995_200_000; // 2022-01-01
        ohlc.iter()
            .enumerate()
            .map(|(idx, &(open, high, low, close))| {
                let open_time = start + idx as i64 * width_ms;
                RawKline(vec![
                    KlineField::from(open_time),
                    open.to_string().into(),
                    high.to_string().into(),
                    low.to_string().into(),
                    close.to_string().into(),
                    "1.0".into(),
                    KlineField::from(open_time + width_ms - 1),
                    "0".into(),
                    KlineField::from(0_i64),
                    "0".into(),
                    "0".into(),
                    "0".into(),
                ])
            })
            .collect()
    }

    /// Seven candles whose middle one is a base candle spanning `bottom..top`,
    /// with busy candles far above it on either side.
    pub(crate) fn single_zone(bottom: f64, top: f64) -> Vec<(f64, f64, f64, f64)> {
        let far = (10_000.0, 10_011.0, 9_999.0, 10_010.0);
        let mid = (bottom + top) / 2.0;
        vec![far, far, far, (mid, top, bottom, mid), far, far, far]
    }

    pub(crate) fn request() -> MultiTimeframeRequest {
        MultiTimeframeRequest {
            symbol: "FILUSDT".to_string(),
            high: "1d".parse().unwrap(),
            intermediate: "4h".parse().unwrap(),
            low: "1h".parse().unwrap(),
            end_time: Utc.with_ymd_and_hms(2022, 5, 7, 9, 59, 0).unwrap(),
        }
    }

    pub(crate) fn nested_source() -> FakeSource {
        FakeSource::new(HashMap::from([
            ("1d".to_string(), rows(86_400_000, &single_zone(10.0, 20.0))),
            ("4h".to_string(), rows(14_400_000, &single_zone(12.0, 18.0))),
            ("1h".to_string(), rows(3_600_000, &single_zone(13.0, 14.0))),
        ]))
    }

    #[tokio::test]
    async fn full_chain_nests_and_projects() {
        let source = nested_source();

        let report = run_multi_timeframe(&source, &request(), &ZoneDetector::default())
            .await
            .unwrap();

        assert_eq!(report.series.len(), 3);
        assert_eq!(report.series_for(TimeframeRole::Low).unwrap().candles.len(), 7);
        assert_eq!(report.zones_for(TimeframeRole::High).len(), 1);
        assert_eq!(report.zones_for(TimeframeRole::Intermediate).len(), 1);
        assert_eq!(report.zones_for(TimeframeRole::Low).len(), 1);

        let prices: Vec<f64> = report.analysis.levels.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![20.0, 10.0, 18.0, 12.0, 14.0, 13.0]);

        let seen = source.seen.lock().unwrap();
        let order: Vec<String> = seen.iter().map(|r| r.timeframe.to_string()).collect();
        assert_eq!(order, vec!["1d", "4h", "1h"], "fetched coarsest first");
        assert!(seen.iter().all(|r| r.limit == 365 && r.end_time == request().end_time));
    }

    #[tokio::test]
    async fn malformed_row_aborts_everything() {
        let mut source = nested_source();
        let low = source.rows.get_mut("1h").unwrap();
        low[2].0[4] = "garbage".into();

        let err = run_multi_timeframe(&source, &request(), &ZoneDetector::default())
            .await
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("Low timeframe 1h"), "{}", message);
        assert!(message.contains("Malformed candle at row 2"), "{}", message);
    }

    #[tokio::test]
    async fn fetch_failure_aborts_everything() {
        let mut source = nested_source();
        source.rows.remove("4h");

        let result = run_multi_timeframe(&source, &request(), &ZoneDetector::default()).await;

        assert!(result.is_err());
        assert_eq!(source.seen.lock().unwrap().len(), 2, "low timeframe never fetched");
    }

    #[tokio::test]
    async fn unrepresentable_lookback_fails_before_fetching() {
        let source = nested_source();
        let request = MultiTimeframeRequest {
            high: "1000000d".parse().unwrap(),
            ..request()
        };

        let err = run_multi_timeframe(&source, &request, &ZoneDetector::default())
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("High timeframe 1000000d"), "{:#}", err);
        assert!(source.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_data_is_not_an_error() {
        let source = FakeSource::new(HashMap::from([
            ("1d".to_string(), Vec::new()),
            ("4h".to_string(), Vec::new()),
            ("1h".to_string(), Vec::new()),
        ]));

        let report = run_multi_timeframe(&source, &request(), &ZoneDetector::default())
            .await
            .unwrap();

        assert!(report.analysis.nested.is_empty());
        assert!(report.analysis.levels.is_empty());
    }

    #[test]
    fn analyse_candles_keeps_detected_and_nested_apart() {
        let to_candles = |width_ms, ohlc: &[(f64, f64, f64, f64)]| {
            normalize_klines(&rows(width_ms, ohlc)).unwrap()
        };
        let high = to_candles(86_400_000, &single_zone(10.0, 20.0));
        let intermediate = to_candles(14_400_000, &single_zone(30.0, 40.0));
        let low = to_candles(3_600_000, &single_zone(31.0, 32.0));

        let analysis = analyse_candles(&high, &intermediate, &low, &ZoneDetector::default());

        assert_eq!(analysis.detected.total(), 3);
        assert_eq!(analysis.nested.high.len(), 1);
        assert!(analysis.nested.intermediate.is_empty());
        assert!(analysis.nested.low.is_empty(), "low fits nothing once intermediate is gone");
        assert_eq!(analysis.levels.len(), 2);
    }
}
