use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of trailing rows shown in the forecast preview table.
pub const TAIL_PREVIEW_ROWS: usize = 5;

/// One row of the forecast table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub trend: f64,
    pub trend_lower: f64,
    pub trend_upper: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub additive_terms: f64,
    /// Weekly component, absent when weekly seasonality was not fitted
    pub weekly: Option<f64>,
    /// Yearly component, absent when yearly seasonality was not fitted
    pub yearly: Option<f64>,
    pub yhat: f64,
}

/// An observed closing price, drawn as a point on the forecast chart.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ObservedPoint {
    pub ds: NaiveDate,
    pub y: f64,
}

/// Forecast section of the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastResponse {
    pub symbol: String,
    pub years: u32,
    pub days: usize,
    /// Observations the model was fitted on
    pub observed: Vec<ObservedPoint>,
    /// Full forecast table: history axis extended by `days`
    pub rows: Vec<ForecastPoint>,
}

impl ForecastResponse {
    /// Last rows of the forecast table, for the preview.
    pub fn tail(&self) -> &[ForecastPoint] {
        let start = self.rows.len().saturating_sub(TAIL_PREVIEW_ROWS);
        &self.rows[start..]
    }

    pub fn caption(&self) -> String {
        format!("Forecast plot for {} days", self.days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32) -> ForecastPoint {
        ForecastPoint {
            ds: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            trend: 1.0,
            trend_lower: 1.0,
            trend_upper: 1.0,
            yhat_lower: 0.5,
            yhat_upper: 1.5,
            additive_terms: 0.0,
            weekly: None,
            yearly: None,
            yhat: 1.0,
        }
    }

    #[test]
    fn test_tail_returns_last_rows() {
        let response = ForecastResponse {
            symbol: "AAPL".to_string(),
            years: 1,
            days: 365,
            observed: vec![],
            rows: (1..=8).map(point).collect(),
        };
        let tail = response.tail();
        assert_eq!(tail.len(), TAIL_PREVIEW_ROWS);
        assert_eq!(tail[0].ds, NaiveDate::from_ymd_opt(2021, 1, 4).unwrap());
        assert_eq!(tail[4].ds, NaiveDate::from_ymd_opt(2021, 1, 8).unwrap());
        assert_eq!(response.caption(), "Forecast plot for 365 days");
    }

    #[test]
    fn test_tail_of_short_table() {
        let response = ForecastResponse {
            symbol: "KO".to_string(),
            years: 1,
            days: 365,
            observed: vec![],
            rows: (1..=2).map(point).collect(),
        };
        assert_eq!(response.tail().len(), 2);
    }
}
