//! One dashboard rerun: load prices (memoized), then forecast on the
//! blocking pool.

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{DashboardResponse, ForecastHorizon, ForecastResponse, PriceTable};
use compute::{ComputeError, ForecastRun, forecast_prices};
use market::{MarketError, normalize_symbol};
use polars::prelude::DataFrame;
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

use crate::helpers::converters::{convert_dataframe_to_price_table, convert_forecast_run};
use crate::schemas::{ApiError, AppState, CachedData, api_error};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Compute(#[from] ComputeError),

    #[error("No price data for {symbol} between {start} and {end}")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Forecast task failed: {0}")]
    Task(String),
}

impl PipelineError {
    /// Maps the failure to the HTTP error returned for the rerun.
    pub fn into_api_error(self) -> ApiError {
        match &self {
            PipelineError::Market(MarketError::EmptySymbol) => {
                warn!("Rejected request: {}", self);
                api_error(StatusCode::BAD_REQUEST, "MISSING_SYMBOL", self.to_string())
            }
            PipelineError::Market(MarketError::InvalidRange { .. }) => {
                warn!("Rejected request: {}", self);
                api_error(
                    StatusCode::BAD_REQUEST,
                    "INVALID_DATE_RANGE",
                    "start_date must be before or equal to end_date",
                )
            }
            PipelineError::Market(e) => {
                error!("Market data provider failed: {}", e);
                api_error(StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", self.to_string())
            }
            PipelineError::Compute(e) => {
                error!("Forecast failed: {}", e);
                api_error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "FORECAST_FAILED",
                    self.to_string(),
                )
            }
            PipelineError::NoData { .. } => {
                warn!("{}", self);
                api_error(StatusCode::NOT_FOUND, "NO_DATA", self.to_string())
            }
            PipelineError::Task(e) => {
                error!("Forecast task failed: {}", e);
                api_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Failed to compute forecast",
                )
            }
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// A loaded price table together with the resolved request.
#[derive(Debug, Clone)]
pub struct LoadedPrices {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub df: DataFrame,
}

impl LoadedPrices {
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn to_table(&self) -> PipelineResult<PriceTable> {
        Ok(convert_dataframe_to_price_table(
            &self.symbol,
            self.start,
            self.end,
            &self.df,
        )?)
    }
}

/// Loads the price table, served from the cache when the same
/// `(symbol, start, end)` was loaded before.
pub async fn load_prices(
    state: &AppState,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> PipelineResult<LoadedPrices> {
    let symbol = normalize_symbol(symbol)?;
    if start > end {
        return Err(MarketError::InvalidRange { start, end }.into());
    }

    let cache_key = format!("prices_{}_{}_{}", symbol, start, end);
    if let Some(CachedData::Prices(df)) = state.cache.get(&cache_key).await {
        debug!("Price table for {} served from cache", cache_key);
        return Ok(LoadedPrices {
            symbol,
            start,
            end,
            df,
        });
    }

    trace!("Loading {} from provider {}", symbol, state.provider.name());
    let df = state.provider.fetch(&symbol, start, end).await?;
    info!("Loaded {} price rows for {}", df.height(), symbol);

    state
        .cache
        .insert(cache_key, CachedData::Prices(df.clone()))
        .await;

    Ok(LoadedPrices {
        symbol,
        start,
        end,
        df,
    })
}

/// Fits and predicts on the blocking pool.
pub async fn run_forecast(df: DataFrame, horizon: ForecastHorizon) -> PipelineResult<ForecastRun> {
    let days = horizon.days();
    debug!("Forecasting {} days from {} rows", days, df.height());
    tokio::task::spawn_blocking(move || forecast_prices(&df, days))
        .await
        .map_err(|e| PipelineError::Task(e.to_string()))?
        .map_err(PipelineError::from)
}

/// Loads prices and forecasts them; an empty table is a [`PipelineError::NoData`].
pub async fn forecast_symbol(
    state: &AppState,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    horizon: ForecastHorizon,
) -> PipelineResult<(LoadedPrices, ForecastResponse)> {
    let prices = load_prices(state, symbol, start, end).await?;
    if prices.is_empty() {
        return Err(PipelineError::NoData {
            symbol: prices.symbol,
            start,
            end,
        });
    }

    let run = run_forecast(prices.df.clone(), horizon).await?;
    let response = convert_forecast_run(&prices.symbol, horizon, &run)?;
    Ok((prices, response))
}

/// Full rerun with the sections gated on the inputs: nothing without a
/// symbol, no forecast without rows.
pub async fn dashboard(
    state: &AppState,
    symbol: Option<&str>,
    start: NaiveDate,
    end: NaiveDate,
    horizon: ForecastHorizon,
) -> PipelineResult<DashboardResponse> {
    let Some(symbol) = symbol else {
        debug!("No symbol entered, nothing to load");
        return Ok(DashboardResponse::idle());
    };

    let prices = load_prices(state, symbol, start, end).await?;
    let table = prices.to_table()?;
    if prices.is_empty() {
        info!("No rows for {}, skipping charts", prices.symbol);
        return Ok(DashboardResponse {
            symbol: prices.symbol,
            prices: Some(table),
            forecast: None,
        });
    }

    let run = run_forecast(prices.df.clone(), horizon).await?;
    let forecast = convert_forecast_run(&prices.symbol, horizon, &run)?;

    Ok(DashboardResponse {
        symbol: prices.symbol,
        prices: Some(table),
        forecast: Some(forecast),
    })
}
