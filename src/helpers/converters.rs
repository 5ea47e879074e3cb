use chrono::NaiveDate;
use common::{ForecastHorizon, ForecastPoint, ForecastResponse, ObservedPoint, PricePoint, PriceTable};
use compute::forecast::{
    ADDITIVE_TERMS, DS, ForecastRun, TREND, TREND_LOWER, TREND_UPPER, WEEKLY, YEARLY, YHAT,
    YHAT_LOWER, YHAT_UPPER,
};
use compute::prices::{date_column, f64_column, read_price_bars};
use compute::{ComputeError, Result};
use polars::prelude::DataFrame;

/// Helper function to convert a price table DataFrame to its transport form
pub fn convert_dataframe_to_price_table(
    symbol: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    df: &DataFrame,
) -> Result<PriceTable> {
    let rows = read_price_bars(df)?
        .into_iter()
        .map(|bar| PricePoint {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            adj_close: bar.adj_close,
            volume: bar.volume,
        })
        .collect();

    Ok(PriceTable {
        symbol: symbol.to_string(),
        start_date,
        end_date,
        rows,
    })
}

/// Helper function to convert a forecast run to its transport form
pub fn convert_forecast_run(
    symbol: &str,
    horizon: ForecastHorizon,
    run: &ForecastRun,
) -> Result<ForecastResponse> {
    let df = &run.table;
    let ds = date_column(df, DS)?;
    let required = |name: &str| -> Result<Vec<f64>> {
        f64_column(df, name)?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value.ok_or_else(|| {
                    ComputeError::ForecastComputation(format!("null '{}' at row {}", name, row))
                })
            })
            .collect()
    };

    let trend = required(TREND)?;
    let trend_lower = required(TREND_LOWER)?;
    let trend_upper = required(TREND_UPPER)?;
    let yhat_lower = required(YHAT_LOWER)?;
    let yhat_upper = required(YHAT_UPPER)?;
    let additive_terms = required(ADDITIVE_TERMS)?;
    let yhat = required(YHAT)?;
    let weekly = f64_column(df, WEEKLY)?;
    let yearly = f64_column(df, YEARLY)?;

    let rows = ds
        .into_iter()
        .enumerate()
        .map(|(i, ds)| ForecastPoint {
            ds,
            trend: trend[i],
            trend_lower: trend_lower[i],
            trend_upper: trend_upper[i],
            yhat_lower: yhat_lower[i],
            yhat_upper: yhat_upper[i],
            additive_terms: additive_terms[i],
            weekly: weekly[i],
            yearly: yearly[i],
            yhat: yhat[i],
        })
        .collect();

    let observed = run
        .observed
        .iter()
        .map(|(ds, y)| ObservedPoint { ds: *ds, y: *y })
        .collect();

    Ok(ForecastResponse {
        symbol: symbol.to_string(),
        years: horizon.years(),
        days: run.days,
        observed,
        rows,
    })
}
