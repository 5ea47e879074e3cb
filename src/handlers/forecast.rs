use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::ForecastResponse;
use tracing::{debug, info, instrument, trace, warn};

use crate::helpers::pipeline::{PipelineError, forecast_symbol};
use crate::schemas::{ApiError, ApiResponse, AppState, DashboardQuery, api_error};

/// Forecast the closing price of a symbol
#[utoipa::path(
    get,
    path = "/api/v1/forecast",
    tag = "forecast",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Forecast computed", body = ApiResponse<ForecastResponse>),
        (status = 400, description = "Missing symbol, inverted date range or horizon outside 1-5 years", body = ErrorResponse),
        (status = 404, description = "No price data in the range", body = ErrorResponse),
        (status = 422, description = "Forecast could not be computed", body = ErrorResponse),
        (status = 502, description = "Market data provider failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_forecast(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
) -> Result<Json<ApiResponse<ForecastResponse>>, ApiError> {
    trace!("Entering get_forecast function");

    let Some(symbol) = query.symbol() else {
        warn!("Forecast request without symbol");
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "MISSING_SYMBOL",
            "symbol is required",
        ));
    };
    let horizon = query.horizon();
    let (start, end) = query.resolved_date_range();
    debug!(
        "Forecasting {} for {} days from prices {} to {}",
        symbol,
        horizon.days(),
        start,
        end
    );

    let (_, forecast) = forecast_symbol(&state, symbol, start, end, horizon)
        .await
        .map_err(PipelineError::into_api_error)?;

    info!(
        "Forecast for {} computed with {} rows",
        forecast.symbol,
        forecast.rows.len()
    );

    Ok(Json(ApiResponse {
        message: forecast.caption(),
        data: forecast,
        success: true,
    }))
}
