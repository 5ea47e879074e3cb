use anyhow::Result;
use chrono::NaiveDate;
use common::ForecastHorizon;
use compute::tail_preview;
use std::io::Write;
use tracing::{debug, error, info, trace};

use crate::config::{AppConfig, initialize_app_state};
use crate::helpers::pipeline::{load_prices, run_forecast};
use crate::schemas::AppState;

/// Number of raw price rows printed before the forecast.
const RAW_PREVIEW_ROWS: usize = 5;

/// One headless dashboard rerun printed to stdout.
pub async fn forecast(
    config: &AppConfig,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    years: u32,
) -> Result<()> {
    trace!("Entering forecast command");
    let horizon = ForecastHorizon::new(years)?;
    let state = initialize_app_state(config)?;

    rerun(&state, symbol, start, end, horizon, &mut std::io::stdout()).await
}

/// Loads prices and writes the raw summary and the forecast preview to `out`.
///
/// An empty price table ends the rerun after the summary.
pub async fn rerun<W: Write>(
    state: &AppState,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    horizon: ForecastHorizon,
    out: &mut W,
) -> Result<()> {
    let prices = load_prices(state, symbol, start, end).await.map_err(|e| {
        error!("Failed to load prices: {}", e);
        e
    })?;

    writeln!(out, "Raw data")?;
    writeln!(
        out,
        "{}: {} rows from {} to {} (end exclusive)",
        prices.symbol,
        prices.df.height(),
        start,
        end
    )?;
    if prices.is_empty() {
        info!("No price data for {}, nothing to forecast", prices.symbol);
        return Ok(());
    }
    writeln!(out, "{}", prices.df.tail(Some(RAW_PREVIEW_ROWS)))?;

    debug!("Forecasting {} days", horizon.days());
    let run = run_forecast(prices.df.clone(), horizon).await?;

    writeln!(out)?;
    writeln!(out, "Forecast data")?;
    writeln!(out, "{}", tail_preview(&run.table))?;
    writeln!(out, "Forecast plot for {} days", run.days)?;

    info!("Forecast finished with {} rows", run.table.height());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::{TRADED_SYMBOL, date, setup_test_app_state};

    async fn rerun_output(symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<String> {
        let (state, _) = setup_test_app_state();
        let mut out = Vec::new();
        rerun(&state, symbol, start, end, ForecastHorizon::default(), &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn test_same_day_range_prints_summary_only() {
        let day = date(2020, 1, 1);
        let output = rerun_output(TRADED_SYMBOL, day, day).await.unwrap();

        assert!(output.starts_with("Raw data\n"));
        assert!(output.contains("AAPL: 0 rows"));
        assert!(!output.contains("Forecast data"));
    }

    #[tokio::test]
    async fn test_unknown_symbol_prints_summary_only() {
        let output = rerun_output("NOPE", date(2020, 1, 1), date(2020, 12, 31))
            .await
            .unwrap();

        assert!(output.contains("NOPE: 0 rows"));
        assert!(!output.contains("Forecast plot"));
    }

    #[tokio::test]
    async fn test_full_rerun_prints_forecast() {
        let output = rerun_output(TRADED_SYMBOL, date(2020, 1, 1), date(2020, 12, 31))
            .await
            .unwrap();

        assert!(output.contains("AAPL: 252 rows"));
        assert!(output.contains("Forecast data"));
        assert!(output.trim_end().ends_with("Forecast plot for 365 days"));
    }

    #[tokio::test]
    async fn test_inverted_range_is_an_error() {
        let result = rerun_output(TRADED_SYMBOL, date(2020, 12, 31), date(2020, 1, 1)).await;
        assert!(result.is_err());
    }
}
