use async_trait::async_trait;
use chrono::NaiveDate;
use polars::prelude::DataFrame;

use crate::error::{MarketError, Result};

/// Source of daily price tables.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Loads the daily bars of `symbol` for `[start, end)`.
    ///
    /// Unknown symbols and ranges without trading days give an empty table.
    async fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<DataFrame>;

    /// Short provider name used in logs.
    fn name(&self) -> &str;
}

/// Trims and upper-cases a user supplied symbol.
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(MarketError::EmptySymbol);
    }
    Ok(symbol.to_uppercase())
}

/// Checks that `start` does not come after `end`.
pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(MarketError::InvalidRange { start, end });
    }
    Ok(())
}
