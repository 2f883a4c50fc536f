use std::io::Write;

use anyhow::{Context, Result};

use crate::render::{ChartRenderer, TimeframeChart};

/// Writes charts as pretty JSON for an external plotting tool to pick up.
pub struct JsonChartExport<W: Write> {
    writer: W,
}

impl<W: Write> JsonChartExport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ChartRenderer for JsonChartExport<W> {
    fn render(&mut self, charts: &[TimeframeChart<'_>]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, charts)
            .context("Failed to serialise charts")?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        log::info!("Exported {} charts as JSON", charts.len());
        Ok(())
    }
}
