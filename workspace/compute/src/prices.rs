//! Price table construction and access.
//!
//! The price table is a polars [`DataFrame`] with the trading date stored as a
//! regular `Date` column next to the OHLCV fields, sorted by date.

use chrono::{DateTime, NaiveDate};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::error::{ComputeError, Result};

pub const DATE: &str = "Date";
pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const ADJ_CLOSE: &str = "Adj Close";
pub const VOLUME: &str = "Volume";

/// One daily bar as delivered by a market data provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

impl PriceBar {
    /// Providers emit all-null bars for days without trading.
    fn is_placeholder(&self) -> bool {
        self.open.is_none() && self.high.is_none() && self.low.is_none() && self.close.is_none()
    }
}

/// Builds a price table from provider bars.
///
/// Placeholder bars are dropped, rows are sorted by date and a duplicated
/// date keeps the bar delivered last.
pub fn build_price_table(bars: impl IntoIterator<Item = PriceBar>) -> Result<DataFrame> {
    let mut by_date: BTreeMap<NaiveDate, PriceBar> = BTreeMap::new();
    let mut placeholders = 0usize;

    for bar in bars {
        if bar.is_placeholder() {
            placeholders += 1;
            continue;
        }
        by_date.insert(bar.date, bar);
    }

    if placeholders > 0 {
        debug!("Dropped {} placeholder bars", placeholders);
    }

    let rows: Vec<PriceBar> = by_date.into_values().collect();
    trace!("Building price table with {} rows", rows.len());

    let df = DataFrame::new(vec![
        Column::new(DATE.into(), rows.iter().map(|r| r.date).collect::<Vec<NaiveDate>>()),
        Column::new(OPEN.into(), rows.iter().map(|r| r.open).collect::<Vec<Option<f64>>>()),
        Column::new(HIGH.into(), rows.iter().map(|r| r.high).collect::<Vec<Option<f64>>>()),
        Column::new(LOW.into(), rows.iter().map(|r| r.low).collect::<Vec<Option<f64>>>()),
        Column::new(CLOSE.into(), rows.iter().map(|r| r.close).collect::<Vec<Option<f64>>>()),
        Column::new(
            ADJ_CLOSE.into(),
            rows.iter().map(|r| r.adj_close).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(VOLUME.into(), rows.iter().map(|r| r.volume).collect::<Vec<Option<u64>>>()),
    ])?;

    Ok(df)
}

/// A price table without rows, as returned for unknown symbols.
pub fn empty_price_table() -> Result<DataFrame> {
    build_price_table(Vec::new())
}

/// Reads a date column as calendar dates.
pub fn date_column(df: &DataFrame, name: &str) -> Result<Vec<NaiveDate>> {
    let days = df.column(name)?.cast(&DataType::Int32)?;
    days.as_materialized_series()
        .i32()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            let value = value
                .ok_or_else(|| ComputeError::Date(format!("null date in '{}' at row {}", name, row)))?;
            days_to_date(value).ok_or_else(|| {
                ComputeError::Date(format!("invalid date value in '{}' at row {}: {}", name, row, value))
            })
        })
        .collect()
}

/// Reads a numeric column as nullable floats.
pub fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let values = df.column(name)?.cast(&DataType::Float64)?;
    Ok(values.as_materialized_series().f64()?.into_iter().collect())
}

fn u64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<u64>>> {
    let values = df.column(name)?.cast(&DataType::UInt64)?;
    Ok(values.as_materialized_series().u64()?.into_iter().collect())
}

/// Reads every row of a price table back into bars.
pub fn read_price_bars(df: &DataFrame) -> Result<Vec<PriceBar>> {
    let dates = date_column(df, DATE)?;
    let open = f64_column(df, OPEN)?;
    let high = f64_column(df, HIGH)?;
    let low = f64_column(df, LOW)?;
    let close = f64_column(df, CLOSE)?;
    let adj_close = f64_column(df, ADJ_CLOSE)?;
    let volume = u64_column(df, VOLUME)?;

    Ok(dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| PriceBar {
            date,
            open: open[i],
            high: high[i],
            low: low[i],
            close: close[i],
            adj_close: adj_close[i],
            volume: volume[i],
        })
        .collect())
}

pub fn is_strictly_increasing(dates: &[NaiveDate]) -> bool {
    dates.windows(2).all(|pair| pair[0] < pair[1])
}

fn days_to_date(days: i32) -> Option<NaiveDate> {
    DateTime::from_timestamp(i64::from(days) * 86_400, 0).map(|dt| dt.date_naive())
}
