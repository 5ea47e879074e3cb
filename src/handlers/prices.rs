use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::PriceTable;
use tracing::{debug, info, instrument, trace, warn};

use crate::helpers::pipeline::{PipelineError, load_prices};
use crate::schemas::{ApiError, ApiResponse, AppState, DashboardQuery, api_error};

/// Load the daily price table of a symbol
#[utoipa::path(
    get,
    path = "/api/v1/prices",
    tag = "market",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Price table loaded; empty for unknown symbols", body = ApiResponse<PriceTable>),
        (status = 400, description = "Missing symbol or inverted date range", body = ErrorResponse),
        (status = 502, description = "Market data provider failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_prices(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
) -> Result<Json<ApiResponse<PriceTable>>, ApiError> {
    trace!("Entering get_prices function");

    let Some(symbol) = query.symbol() else {
        warn!("Price request without symbol");
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "MISSING_SYMBOL",
            "symbol is required",
        ));
    };
    let (start, end) = query.resolved_date_range();
    debug!("Loading prices for {} from {} to {}", symbol, start, end);

    let prices = load_prices(&state, symbol, start, end)
        .await
        .map_err(PipelineError::into_api_error)?;
    let table = prices.to_table().map_err(PipelineError::into_api_error)?;

    let message = if table.is_empty() {
        format!("No price data found for {}", table.symbol)
    } else {
        "Price data retrieved successfully".to_string()
    };
    info!("Returning {} price rows for {}", table.len(), table.symbol);

    Ok(Json(ApiResponse {
        data: table,
        message,
        success: true,
    }))
}
