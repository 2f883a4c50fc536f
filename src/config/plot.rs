//! Chart overlay configuration handed to the renderer

pub struct PlotConfig {
    /// Overlay colour for levels coming from the High (coarsest) timeframe
    pub high_level_color: &'static str,
    /// Overlay colour for levels coming from the Intermediate timeframe
    pub intermediate_level_color: &'static str,
    /// Overlay colour for levels coming from the Low (finest) timeframe
    pub low_level_color: &'static str,
    /// Width of horizontal level lines
    pub level_line_width: f32,
    /// Opacity of horizontal level lines (0.0 = invisible, 1.0 = fully opaque)
    pub level_line_alpha: f32,
    /// Draw price on a logarithmic axis
    pub log_price_axis: bool,
    /// Draw the volume sub-panel under the candles
    pub show_volume: bool,
}

pub const PLOT: PlotConfig = PlotConfig {
    high_level_color: "red",
    intermediate_level_color: "green",
    low_level_color: "blue",
    level_line_width: 1.0,
    level_line_alpha: 0.4,
    log_price_axis: true,
    show_volume: true,
};
