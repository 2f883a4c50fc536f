// Hand-off to the chart renderer collaborator
pub mod json_export;

use anyhow::Result;
use serde::Serialize;

use crate::analysis::MultiTimeframeReport;
use crate::config::PLOT;
use crate::domain::{Candle, Timeframe, TimeframeRole};
use crate::models::Level;

pub use json_export::JsonChartExport;

/// One horizontal overlay line: a level plus the colour picked from its role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayLine {
    pub price: f64,
    pub role: TimeframeRole,
    pub color: &'static str,
}

impl From<&Level> for OverlayLine {
    fn from(level: &Level) -> Self {
        OverlayLine {
            price: level.price,
            role: level.role,
            color: level.color(),
        }
    }
}

/// Everything needed to draw one timeframe's candlestick chart.
/// Every chart carries the full combined level list, not just its own role's levels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeframeChart<'a> {
    pub symbol: &'a str,
    pub role: TimeframeRole,
    pub timeframe: Timeframe,
    pub candles: &'a [Candle],
    pub overlays: Vec<OverlayLine>,
    pub line_width: f32,
    pub line_alpha: f32,
    pub log_price_axis: bool,
    pub show_volume: bool,
}

/// Charts for a report, High first.
pub fn charts_for_report(report: &MultiTimeframeReport) -> Vec<TimeframeChart<'_>> {
    let overlays: Vec<OverlayLine> = report.analysis.levels.iter().map(OverlayLine::from).collect();
    report
        .series
        .iter()
        .map(|series| TimeframeChart {
            symbol: &report.symbol,
            role: series.role,
            timeframe: series.timeframe,
            candles: &series.candles,
            overlays: overlays.clone(),
            line_width: PLOT.level_line_width,
            line_alpha: PLOT.level_line_alpha,
            log_price_axis: PLOT.log_price_axis,
            show_volume: PLOT.show_volume,
        })
        .collect()
}

/// A renderer accepts the charts and draws (or exports) them.
pub trait ChartRenderer {
    fn render(&mut self, charts: &[TimeframeChart<'_>]) -> Result<()>;
}
