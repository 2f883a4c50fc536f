//! Candle normaliser: raw kline rows in, typed candles out.
//!
//! A pure map. Rows are neither dropped nor reordered, and the raw rows are left
//! untouched. The first unreadable numeric field fails the whole sequence.

use chrono::{DateTime, Utc};

use crate::data::raw_kline::{KlineError, KlineField, RawKline, columns};
use crate::domain::Candle;
use crate::utils::time_utils;

fn cell(row_idx: usize, row: &RawKline, column: usize) -> Result<&KlineField, KlineError> {
    row.field(column).ok_or(KlineError::TooFewFields {
        row: row_idx,
        len: row.len(),
    })
}

fn read_price(
    row_idx: usize,
    row: &RawKline,
    column: usize,
    name: &'static str,
) -> Result<f64, KlineError> {
    let field = cell(row_idx, row, column)?;
    field.as_f64().ok_or_else(|| KlineError::MalformedCandle {
        row: row_idx,
        field: name,
        value: field.to_string(),
    })
}

fn read_time(
    row_idx: usize,
    row: &RawKline,
    column: usize,
    name: &'static str,
) -> Result<DateTime<Utc>, KlineError> {
    let field = cell(row_idx, row, column)?;
    field
        .as_epoch_ms()
        .and_then(time_utils::epoch_ms_to_datetime)
        .ok_or_else(|| KlineError::MalformedCandle {
            row: row_idx,
            field: name,
            value: field.to_string(),
        })
}

/// Convert a single row. `row_idx` is only used for error messages.
pub fn candle_from_row(row_idx: usize, row: &RawKline) -> Result<Candle, KlineError> {
    if row.len() < columns::REQUIRED {
        return Err(KlineError::TooFewFields {
            row: row_idx,
            len: row.len(),
        });
    }

    Ok(Candle::new(
        read_time(row_idx, row, columns::OPEN_TIME, "open_time")?,
        read_time(row_idx, row, columns::CLOSE_TIME, "close_time")?,
        read_price(row_idx, row, columns::OPEN, "open")?,
        read_price(row_idx, row, columns::HIGH, "high")?,
        read_price(row_idx, row, columns::LOW, "low")?,
        read_price(row_idx, row, columns::CLOSE, "close")?,
        read_price(row_idx, row, columns::VOLUME, "volume")?,
    ))
}

/// Normalise one timeframe's rows, oldest first. Output length always equals input length.
pub fn normalize_klines(rows: &[RawKline]) -> Result<Vec<Candle>, KlineError> {
    let candles = rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| candle_from_row(row_idx, row))
        .collect::<Result<Vec<_>, _>>()?;

    // Downstream assumes ascending unique open times; we report but do not repair.
    if let Some(pos) = candles
        .windows(2)
        .position(|pair| pair[1].open_time <= pair[0].open_time)
    {
        log::warn!(
            "Candle open times are not strictly ascending at row {} ({} then {})",
            pos + 1,
            time_utils::format_utc(&candles[pos].open_time),
            time_utils::format_utc(&candles[pos + 1].open_time),
        );
    }

    Ok(candles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 3_600_000;

    fn row(open_time_ms: i64, open: &str, high: &str, low: &str, close: &str) -> RawKline {
        RawKline(vec![
            KlineField::from(open_time_ms),
            open.into(),
            high.into(),
            low.into(),
            close.into(),
            "150.25".into(),
            KlineField::from(open_time_ms + HOUR_MS - 1),
            "1000.0".into(),
            KlineField::from(42_i64),
            "75.0".into(),
            "500.0".into(),
            "0".into(),
        ])
    }

    #[test]
    fn converts_fields_and_derives_momentum() {
        let rows = vec![
            row(1_651_917_540_000, "7.41", "7.50", "7.30", "7.45"),
            row(1_651_917_540_000 + HOUR_MS, "7.45", "7.46", "7.20", "7.25"),
        ];

        let candles = normalize_klines(&rows).unwrap();

        assert_eq!(candles.len(), 2);
        let first = &candles[0];
        assert_eq!(first.open_time.timestamp_millis(), 1_651_917_540_000);
        assert_eq!(
            first.close_time.timestamp_millis(),
            1_651_917_540_000 + HOUR_MS - 1
        );
        assert_eq!(first.open_price, 7.41);
        assert_eq!(first.high_price, 7.50);
        assert_eq!(first.low_price, 7.30);
        assert_eq!(first.close_price, 7.45);
        assert_eq!(first.volume, 150.25);
        assert!((first.momentum - 0.04).abs() < 1e-12);
        assert!((candles[1].momentum - 0.20).abs() < 1e-12);
    }

    #[test]
    fn keeps_row_order_even_when_unsorted() {
        let rows = vec![
            row(3 * HOUR_MS, "3", "3", "3", "3"),
            row(HOUR_MS, "1", "1", "1", "1"),
            row(2 * HOUR_MS, "2", "2", "2", "2"),
        ];

        let candles = normalize_klines(&rows).unwrap();
        let opens: Vec<f64> = candles.iter().map(|c| c.open_price).collect();
        assert_eq!(opens, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn unparsable_price_is_malformed() {
        let rows = vec![
            row(0, "1", "2", "0.5", "1.5"),
            row(HOUR_MS, "1", "n/a", "0.5", "1.5"),
        ];

        let err = normalize_klines(&rows).unwrap_err();
        assert_eq!(
            err,
            KlineError::MalformedCandle {
                row: 1,
                field: "high",
                value: "\"n/a\"".to_string()
            }
        );
    }

    #[test]
    fn unparsable_time_is_malformed() {
        let mut bad = row(0, "1", "2", "0.5", "1.5");
        bad.0[columns::CLOSE_TIME] = "yesterday".into();

        let err = candle_from_row(7, &bad).unwrap_err();
        assert!(matches!(
            err,
            KlineError::MalformedCandle { row: 7, field: "close_time", .. }
        ));
    }

    #[test]
    fn short_rows_are_rejected_but_extra_fields_are_ignored() {
        let mut short = row(0, "1", "2", "0.5", "1.5");
        short.0.truncate(5);
        assert_eq!(
            candle_from_row(0, &short).unwrap_err(),
            KlineError::TooFewFields { row: 0, len: 5 }
        );

        let mut minimal = row(0, "1", "2", "0.5", "1.5");
        minimal.0.truncate(columns::REQUIRED);
        assert!(candle_from_row(0, &minimal).is_ok());
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(normalize_klines(&[]).unwrap().is_empty());
    }
}
