// Data fetching and candle normalisation
#[cfg(not(target_arch = "wasm32"))]
pub mod bn_kline;
pub mod normalize;
pub mod raw_kline;
pub mod source;

// Re-export commonly used types
#[cfg(not(target_arch = "wasm32"))]
pub use bn_kline::BinanceKlineSource;
pub use normalize::normalize_klines;
pub use raw_kline::{KlineError, KlineField, RawKline};
pub use source::{KlineRequest, KlineSource};
