use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use strum::IntoEnumIterator;
use tokio::runtime::Runtime;

use nested_zones::Cli;
use nested_zones::analysis::{ZoneDetector, run_multi_timeframe};
use nested_zones::config::binance::BinanceApiConfig;
use nested_zones::data::BinanceKlineSource;
use nested_zones::domain::TimeframeRole;
use nested_zones::render::{ChartRenderer, JsonChartExport, charts_for_report};

fn main() -> Result<()> {
    // A. Init Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // B. Parse Args (timeframes are validated here, before anything is fetched)
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    let request = args.request(chrono::Utc::now());
    let detector = ZoneDetector::new(args.zone_params());

    // C. Fetch + analyse (one call per timeframe, in sequence)
    let source = BinanceKlineSource::new(&BinanceApiConfig::default())?;
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let report = rt.block_on(run_multi_timeframe(&source, &request, &detector))?;
    for role in TimeframeRole::iter() {
        if let Some(series) = report.series_for(role) {
            log::info!(
                "{} {}: {} zones kept after nesting",
                role,
                series.timeframe,
                report.zones_for(role).len()
            );
        }
    }

    // D. Hand the charts to the renderer
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {:?}", path))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut renderer = JsonChartExport::new(writer);
    renderer.render(&charts_for_report(&report))?;

    log::info!(
        "{}: {} levels across {} nested zones",
        report.symbol,
        report.analysis.levels.len(),
        report.analysis.nested.total()
    );
    Ok(())
}
