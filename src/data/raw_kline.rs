use std::fmt;

use serde::{Deserialize, Serialize};

/// Column positions of a kline row as the exchange returns it.
pub mod columns {
    pub const OPEN_TIME: usize = 0;
    pub const OPEN: usize = 1;
    pub const HIGH: usize = 2;
    pub const LOW: usize = 3;
    pub const CLOSE: usize = 4;
    pub const VOLUME: usize = 5;
    pub const CLOSE_TIME: usize = 6;
    pub const QUOTE_VOLUME: usize = 7;
    pub const TRADE_COUNT: usize = 8;
    pub const TAKER_BUY_BASE: usize = 9;
    pub const TAKER_BUY_QUOTE: usize = 10;
    pub const IGNORED: usize = 11;

    /// Fields past `CLOSE_TIME` are carried but never read
    pub const REQUIRED: usize = CLOSE_TIME + 1;
    pub const FULL_ROW: usize = IGNORED + 1;
}

/// One cell of a raw kline row. Times and trade counts arrive as integers,
/// prices and volumes as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KlineField {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl KlineField {
    /// Numeric value of this cell, or `None` if it cannot be read as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            KlineField::Integer(v) => Some(*v as f64),
            KlineField::Float(v) => Some(*v),
            KlineField::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Epoch-millisecond value of this cell. Fractional values are rejected.
    pub fn as_epoch_ms(&self) -> Option<i64> {
        match self {
            KlineField::Integer(v) => Some(*v),
            KlineField::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            KlineField::Float(_) => None,
            KlineField::Text(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|v| v.fract() == 0.0 && v.is_finite())
                        .map(|v| v as i64)
                })
            }
        }
    }
}

impl fmt::Display for KlineField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KlineField::Integer(v) => write!(f, "{}", v),
            KlineField::Float(v) => write!(f, "{}", v),
            KlineField::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i64> for KlineField {
    fn from(value: i64) -> Self {
        KlineField::Integer(value)
    }
}

impl From<f64> for KlineField {
    fn from(value: f64) -> Self {
        KlineField::Float(value)
    }
}

impl From<&str> for KlineField {
    fn from(value: &str) -> Self {
        KlineField::Text(value.to_string())
    }
}

impl From<String> for KlineField {
    fn from(value: String) -> Self {
        KlineField::Text(value)
    }
}

/// A kline row exactly as fetched: `(open_time_ms, open, high, low, close, volume,
/// close_time_ms, quote_volume, trade_count, taker_buy_base, taker_buy_quote, ignored)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawKline(pub Vec<KlineField>);

impl RawKline {
    pub fn field(&self, column: usize) -> Option<&KlineField> {
        self.0.get(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<KlineField>> for RawKline {
    fn from(fields: Vec<KlineField>) -> Self {
        RawKline(fields)
    }
}

// Custom error type for raw klines so the offending row and cell show up in messages.
#[derive(Debug, Clone, PartialEq)]
pub enum KlineError {
    /// A numeric field could not be parsed. No substitute candle is produced.
    MalformedCandle {
        row: usize,
        field: &'static str,
        value: String,
    },
    TooFewFields {
        row: usize,
        len: usize,
    },
}

impl fmt::Display for KlineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KlineError::MalformedCandle { row, field, value } => write!(
                f,
                "Malformed candle at row {}: {} = {} is not a number",
                row, field, value
            ),
            KlineError::TooFewFields { row, len } => write!(
                f,
                "Malformed candle at row {}: expected at least {} fields, got {}",
                row,
                columns::REQUIRED,
                len
            ),
        }
    }
}

impl std::error::Error for KlineError {}
