use axum::{http::StatusCode, response::Json};
use chrono::{NaiveDate, Utc};
use common::{
    DashboardResponse, ForecastHorizon, ForecastPoint, ForecastResponse, ObservedPoint, PricePoint,
    PriceTable, SymbolList,
};
use market::PriceProvider;
use moka::future::Cache;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Market data source
    pub provider: Arc<dyn PriceProvider>,
    /// Loaded price tables keyed by symbol and date range
    pub cache: Cache<String, CachedData>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Prices(DataFrame),
}

/// Inputs of one dashboard rerun
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct DashboardQuery {
    /// Ticker symbol; empty means nothing is loaded
    pub symbol: Option<String>,
    /// First day to load (YYYY-MM-DD, default today)
    pub start_date: Option<NaiveDate>,
    /// Day after the last day to load (YYYY-MM-DD, default today)
    pub end_date: Option<NaiveDate>,
    /// Years to predict (1-5, default 1)
    #[validate(range(min = 1, max = 5))]
    pub years: Option<u32>,
}

impl DashboardQuery {
    /// The trimmed symbol, `None` when empty.
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Start and end dates with missing values defaulting to `today`.
    pub fn date_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (
            self.start_date.unwrap_or(today),
            self.end_date.unwrap_or(today),
        )
    }

    pub fn resolved_date_range(&self) -> (NaiveDate, NaiveDate) {
        self.date_range(Utc::now().date_naive())
    }

    /// Forecast horizon, one year when `years` is missing.
    /// Out-of-range values are rejected by validation before this is called.
    pub fn horizon(&self) -> ForecastHorizon {
        self.years
            .and_then(|years| ForecastHorizon::new(years).ok())
            .unwrap_or_default()
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(code, error)))
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Configured market data provider
    pub provider: String,
    /// Approximate number of memoized price tables
    pub cache_entries: u64,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::symbols::get_symbols,
        crate::handlers::prices::get_prices,
        crate::handlers::forecast::get_forecast,
        crate::handlers::dashboard::get_dashboard,
    ),
    components(
        schemas(
            ApiResponse<SymbolList>,
            ApiResponse<PriceTable>,
            ApiResponse<ForecastResponse>,
            ApiResponse<DashboardResponse>,
            ErrorResponse,
            HealthResponse,
            DashboardQuery,
            SymbolList,
            PriceTable,
            PricePoint,
            ForecastResponse,
            ForecastPoint,
            ObservedPoint,
            DashboardResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "market", description = "Price loading endpoints"),
        (name = "forecast", description = "Closing price forecast endpoints"),
        (name = "dashboard", description = "Full dashboard rerun"),
    ),
    info(
        title = "Stockcast API",
        description = "Stock price dashboard API - loads daily prices and forecasts closing prices",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
