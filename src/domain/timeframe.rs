use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::config::PLOT;
use crate::utils::TimeUtils;

/// Unit suffix of a Binance-style timeframe string (`15m`, `4h`, `1d`, `1w`, `1M`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl TimeUnit {
    pub fn from_suffix(suffix: char) -> Option<Self> {
        match suffix {
            'm' => Some(TimeUnit::Minute),
            'h' => Some(TimeUnit::Hour),
            'd' => Some(TimeUnit::Day),
            'w' => Some(TimeUnit::Week),
            'M' => Some(TimeUnit::Month),
            _ => None,
        }
    }

    pub fn suffix(self) -> char {
        match self {
            TimeUnit::Minute => 'm',
            TimeUnit::Hour => 'h',
            TimeUnit::Day => 'd',
            TimeUnit::Week => 'w',
            TimeUnit::Month => 'M',
        }
    }

    pub fn duration_ms(self) -> i64 {
        match self {
            TimeUnit::Minute => TimeUtils::MS_IN_MIN,
            TimeUnit::Hour => TimeUtils::MS_IN_H,
            TimeUnit::Day => TimeUtils::MS_IN_D,
            TimeUnit::Week => TimeUtils::MS_IN_W,
            TimeUnit::Month => TimeUtils::MS_IN_1_M,
        }
    }
}

/// Why a timeframe string was rejected. Raised before any data is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidTimeframe {
    Empty,
    UnknownUnit { timeframe: String, suffix: char },
    BadMagnitude { timeframe: String },
}

impl fmt::Display for InvalidTimeframe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidTimeframe::Empty => write!(f, "Invalid timeframe: empty string"),
            InvalidTimeframe::UnknownUnit { timeframe, suffix } => write!(
                f,
                "Invalid timeframe '{}': unit '{}' is not one of m, h, d, w, M",
                timeframe, suffix
            ),
            InvalidTimeframe::BadMagnitude { timeframe } => write!(
                f,
                "Invalid timeframe '{}': expected a positive whole number before the unit",
                timeframe
            ),
        }
    }
}

impl std::error::Error for InvalidTimeframe {}

/// A candle width such as `4h`: a magnitude and a validated unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe {
    magnitude: u32,
    unit: TimeUnit,
}

impl Timeframe {
    /// Rejects a zero magnitude and widths too long to express as a `TimeDelta`.
    pub fn new(magnitude: u32, unit: TimeUnit) -> Result<Self, InvalidTimeframe> {
        let width_ms = (magnitude as i64).checked_mul(unit.duration_ms());
        if magnitude == 0 || width_ms.and_then(Duration::try_milliseconds).is_none() {
            return Err(InvalidTimeframe::BadMagnitude {
                timeframe: format!("{}{}", magnitude, unit.suffix()),
            });
        }
        Ok(Timeframe { magnitude, unit })
    }

    pub fn magnitude(&self) -> u32 {
        self.magnitude
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Width in milliseconds. `new` has already checked that this fits.
    pub fn duration_ms(&self) -> i64 {
        self.magnitude as i64 * self.unit.duration_ms()
    }

    /// Start of a window that ends at `end_time` and spans `intervals` candles of this width.
    /// `None` when the start would fall outside chrono's representable range.
    pub fn lookback_start(&self, end_time: DateTime<Utc>, intervals: i32) -> Option<DateTime<Utc>> {
        let span = self
            .duration_ms()
            .checked_mul(intervals as i64)
            .and_then(Duration::try_milliseconds)?;
        end_time.checked_sub_signed(span)
    }
}

impl FromStr for Timeframe {
    type Err = InvalidTimeframe;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let suffix = text.chars().last().ok_or(InvalidTimeframe::Empty)?;
        let unit = TimeUnit::from_suffix(suffix).ok_or_else(|| InvalidTimeframe::UnknownUnit {
            timeframe: text.to_string(),
            suffix,
        })?;
        let bad_magnitude = || InvalidTimeframe::BadMagnitude {
            timeframe: text.to_string(),
        };
        let magnitude = text[..text.len() - suffix.len_utf8()]
            .parse::<u32>()
            .map_err(|_| bad_magnitude())?;
        Timeframe::new(magnitude, unit).map_err(|_| bad_magnitude())
    }
}

impl TryFrom<String> for Timeframe {
    type Error = InvalidTimeframe;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<Timeframe> for String {
    fn from(timeframe: Timeframe) -> Self {
        timeframe.to_string()
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.suffix())
    }
}

/// Position of a timeframe in the three-level hierarchy, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum TimeframeRole {
    High,
    Intermediate,
    Low,
}

impl TimeframeRole {
    /// Colour the renderer uses for this role's level overlays
    pub fn overlay_color(self) -> &'static str {
        match self {
            TimeframeRole::High => PLOT.high_level_color,
            TimeframeRole::Intermediate => PLOT.intermediate_level_color,
            TimeframeRole::Low => PLOT.low_level_color,
        }
    }
}
