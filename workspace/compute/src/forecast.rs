//! Closing-price forecasting.
//!
//! The price table is reshaped into a `(ds, y)` series, fitted with a
//! [`DecompositionModel`] and extrapolated over the requested number of days.

pub mod linalg;
pub mod model;
pub mod seasonality;
pub mod trend;

use chrono::NaiveDate;
use polars::prelude::*;
use tracing::{debug, info, instrument, trace};

pub use model::{DecompositionModel, FittedModel, MIN_OBSERVATIONS, ModelConfig};

use crate::error::Result;
use crate::prices::{CLOSE, DATE};

pub const DS: &str = "ds";
pub const Y: &str = "y";
pub const TREND: &str = "trend";
pub const TREND_LOWER: &str = "trend_lower";
pub const TREND_UPPER: &str = "trend_upper";
pub const YHAT_LOWER: &str = "yhat_lower";
pub const YHAT_UPPER: &str = "yhat_upper";
pub const ADDITIVE_TERMS: &str = "additive_terms";
pub const WEEKLY: &str = "weekly";
pub const YEARLY: &str = "yearly";
pub const YHAT: &str = "yhat";

/// Output columns of [`FittedModel::predict`], in order.
pub const FORECAST_COLUMNS: [&str; 10] = [
    DS,
    TREND,
    TREND_LOWER,
    TREND_UPPER,
    YHAT_LOWER,
    YHAT_UPPER,
    ADDITIVE_TERMS,
    WEEKLY,
    YEARLY,
    YHAT,
];

/// Projects a price table to the model input `(ds, y)`.
pub fn to_model_frame(prices: &DataFrame) -> Result<DataFrame> {
    let mut frame = prices.select([DATE, CLOSE])?;
    frame.rename(DATE, DS.into())?;
    frame.rename(CLOSE, Y.into())?;
    Ok(frame)
}

/// Inverse of [`to_model_frame`].
pub fn from_model_frame(frame: &DataFrame) -> Result<DataFrame> {
    let mut prices = frame.select([DS, Y])?;
    prices.rename(DS, DATE.into())?;
    prices.rename(Y, CLOSE.into())?;
    Ok(prices)
}

/// Result of one forecast run.
#[derive(Debug, Clone)]
pub struct ForecastRun {
    /// Prediction over the history axis extended by the horizon
    pub table: DataFrame,
    /// Points the model was fitted on
    pub observed: Vec<(NaiveDate, f64)>,
    pub days: usize,
}

impl ForecastRun {
    pub fn tail(&self) -> DataFrame {
        tail_preview(&self.table)
    }
}

/// Fits the default model to the closing prices and predicts `days` calendar
/// days past the last date of the table.
#[instrument(skip(prices), fields(rows = prices.height()))]
pub fn forecast_prices(prices: &DataFrame, days: usize) -> Result<ForecastRun> {
    trace!("Preparing model frame");
    let frame = to_model_frame(prices)?;

    let model = crate::default_model().fit(&frame)?;
    debug!(
        "Model uses {} changepoints and seasonalities {:?}",
        model.changepoint_count(),
        model.seasonalities()
    );

    let future = model.make_future_dataframe(days)?;
    let table = model.predict(&future)?;

    info!(
        "Forecast computed: {} history rows, {} predicted rows",
        model.history_dates().len(),
        table.height()
    );

    Ok(ForecastRun {
        table,
        observed: model.observations().to_vec(),
        days,
    })
}

/// Number of rows shown in the forecast preview.
pub const TAIL_ROWS: usize = 5;

/// Final rows of a forecast table.
pub fn tail_preview(table: &DataFrame) -> DataFrame {
    table.tail(Some(TAIL_ROWS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComputeError;
    use crate::prices::{PriceBar, build_price_table, date_column, f64_column};
    use chrono::{Datelike, Duration, Weekday};

    /// First `n` weekdays from 2020-01-01 with closing prices from `close`.
    fn weekday_table(n: usize, close: impl Fn(i64) -> Option<f64>) -> DataFrame {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let bars: Vec<PriceBar> = (0..)
            .map(|d| start + Duration::days(d))
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .take(n)
            .map(|date| {
                let value = close((date - start).num_days());
                PriceBar {
                    date,
                    open: Some(value.unwrap_or(100.0) - 0.5),
                    high: Some(value.unwrap_or(100.0) + 1.0),
                    low: Some(value.unwrap_or(100.0) - 1.0),
                    close: value,
                    adj_close: value,
                    volume: Some(1_000_000),
                }
            })
            .collect();
        build_price_table(bars).unwrap()
    }

    fn column(df: &DataFrame, name: &str) -> Vec<f64> {
        f64_column(df, name)
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn test_model_frame_roundtrip_preserves_rows() {
        let prices = weekday_table(20, |d| Some(100.0 + d as f64));
        let frame = to_model_frame(&prices).unwrap();
        let names: Vec<String> = frame.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec![DS, Y]);

        let back = from_model_frame(&frame).unwrap();
        assert_eq!(back.height(), prices.height());
        assert_eq!(
            date_column(&back, DATE).unwrap(),
            date_column(&prices, DATE).unwrap()
        );
        assert_eq!(
            f64_column(&back, CLOSE).unwrap(),
            f64_column(&prices, CLOSE).unwrap()
        );
    }

    #[test]
    fn test_one_year_of_trading_days_plus_one_year_horizon() {
        let prices = weekday_table(252, |d| Some(100.0 + 0.1 * d as f64 + (d as f64 / 9.0).sin()));
        let run = forecast_prices(&prices, 365).unwrap();

        assert_eq!(run.table.height(), 252 + 365);
        let names: Vec<String> = run.table.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, FORECAST_COLUMNS.to_vec());
        assert_eq!(run.observed.len(), 252);

        let history = date_column(&prices, DATE).unwrap();
        let axis = date_column(&run.table, DS).unwrap();
        let last = *history.last().unwrap();
        assert_eq!(axis[..252], history[..]);
        assert_eq!(axis[252], last + Duration::days(1));
        assert_eq!(*axis.last().unwrap(), last + Duration::days(365));

        let tail = run.tail();
        assert_eq!(tail.height(), TAIL_ROWS);
        assert_eq!(date_column(&tail, DS).unwrap(), axis[axis.len() - 5..].to_vec());
    }

    #[test]
    fn test_horizon_boundaries() {
        let prices = weekday_table(60, |d| Some(50.0 + d as f64 * 0.3));
        assert_eq!(forecast_prices(&prices, 1).unwrap().table.height(), 61);
        assert_eq!(forecast_prices(&prices, 1825).unwrap().table.height(), 60 + 1825);
    }

    #[test]
    fn test_insufficient_data_fails() {
        let single = weekday_table(1, |_| Some(10.0));
        let err = forecast_prices(&single, 365).unwrap_err();
        assert!(matches!(
            err,
            ComputeError::InsufficientData { required: 2, found: 1 }
        ));

        let mostly_null = weekday_table(3, |d| if d == 0 { Some(10.0) } else { None });
        let err = forecast_prices(&mostly_null, 365).unwrap_err();
        assert!(matches!(
            err,
            ComputeError::InsufficientData { required: 2, found: 1 }
        ));
    }

    #[test]
    fn test_fit_failure_is_repeatable() {
        let single = weekday_table(1, |_| Some(10.0));
        let first = forecast_prices(&single, 365).unwrap_err();
        let second = forecast_prices(&single, 365).unwrap_err();
        assert_eq!(first, second);

        let flat = weekday_table(30, |_| Some(10.0));
        assert_eq!(
            forecast_prices(&flat, 365).err(),
            forecast_prices(&flat, 365).err()
        );
    }

    #[test]
    fn test_constant_series_fails() {
        let flat = weekday_table(30, |_| Some(42.0));
        let err = forecast_prices(&flat, 30).unwrap_err();
        assert!(matches!(err, ComputeError::DegenerateSeries(_)));
    }

    #[test]
    fn test_null_closes_stay_on_axis() {
        let prices = weekday_table(40, |d| if d == 7 { None } else { Some(20.0 + d as f64) });
        let run = forecast_prices(&prices, 10).unwrap();
        assert_eq!(run.observed.len(), 39);
        assert_eq!(run.table.height(), 40 + 10);
    }

    #[test]
    fn test_linear_series_extrapolates_line() {
        let prices = weekday_table(252, |d| Some(100.0 + 0.05 * d as f64));
        let run = forecast_prices(&prices, 90).unwrap();

        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let axis = date_column(&run.table, DS).unwrap();
        let yhat = column(&run.table, YHAT);
        for (date, value) in axis.iter().zip(&yhat).skip(252).step_by(7) {
            let expected = 100.0 + 0.05 * (*date - start).num_days() as f64;
            assert!(
                (value - expected).abs() < 0.1,
                "{}: expected {}, got {}",
                date,
                expected,
                value
            );
        }
    }

    #[test]
    fn test_intervals_bracket_and_widen() {
        // Rising then falling
        let prices = weekday_table(252, |d| {
            let d = d as f64;
            Some(if d < 200.0 { 100.0 + 0.2 * d } else { 140.0 - 0.3 * (d - 200.0) })
        });
        let run = forecast_prices(&prices, 365).unwrap();

        let yhat = column(&run.table, YHAT);
        let lower = column(&run.table, YHAT_LOWER);
        let upper = column(&run.table, YHAT_UPPER);
        for i in 0..yhat.len() {
            assert!(lower[i] <= yhat[i] && yhat[i] <= upper[i]);
        }

        let trend = column(&run.table, TREND);
        let trend_lower = column(&run.table, TREND_LOWER);
        let trend_upper = column(&run.table, TREND_UPPER);
        for i in 0..252 {
            assert!((trend_upper[i] - trend[i]).abs() < 1e-9);
            assert!((trend[i] - trend_lower[i]).abs() < 1e-9);
        }

        let first_future = trend_upper[252] - trend_lower[252];
        let last = trend_upper[yhat.len() - 1] - trend_lower[yhat.len() - 1];
        assert!(last > first_future);
        assert!(upper[yhat.len() - 1] - lower[yhat.len() - 1] > upper[0] - lower[0]);
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let prices = weekday_table(120, |d| Some(30.0 + (d as f64 / 5.0).cos() + 0.02 * d as f64));
        let a = forecast_prices(&prices, 30).unwrap();
        let b = forecast_prices(&prices, 30).unwrap();
        assert!(a.table.equals_missing(&b.table));
    }

    #[test]
    fn test_seasonal_components_follow_history_span() {
        let short = weekday_table(60, |d| Some(10.0 + 0.1 * d as f64 + (d as f64).sin()));
        let run = forecast_prices(&short, 5).unwrap();
        assert_eq!(run.table.column(WEEKLY).unwrap().null_count(), 0);
        assert_eq!(run.table.column(YEARLY).unwrap().null_count(), run.table.height());

        // ~3 years of weekdays spans more than two years
        let long = weekday_table(780, |d| Some(10.0 + 0.01 * d as f64 + (d as f64 / 58.0).sin()));
        let run = forecast_prices(&long, 5).unwrap();
        assert_eq!(run.table.column(YEARLY).unwrap().null_count(), 0);
    }
}
