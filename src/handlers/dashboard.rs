use axum::{
    extract::{Query, State},
    response::Json,
};
use axum_valid::Valid;
use common::DashboardResponse;
use tracing::{debug, info, instrument, trace};

use crate::helpers::pipeline::{PipelineError, dashboard};
use crate::schemas::{ApiError, ApiResponse, AppState, DashboardQuery};

/// Run the whole dashboard for the current inputs
///
/// Without a symbol nothing is loaded. An empty price table is returned
/// without a forecast.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard sections for the inputs", body = ApiResponse<DashboardResponse>),
        (status = 400, description = "Inverted date range or horizon outside 1-5 years", body = ErrorResponse),
        (status = 422, description = "Forecast could not be computed", body = ErrorResponse),
        (status = 502, description = "Market data provider failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError> {
    trace!("Entering get_dashboard function");

    let horizon = query.horizon();
    let (start, end) = query.resolved_date_range();
    debug!(
        "Dashboard rerun: symbol {:?}, {} to {}, {} years",
        query.symbol(),
        start,
        end,
        horizon.years()
    );

    let response = dashboard(&state, query.symbol(), start, end, horizon)
        .await
        .map_err(PipelineError::into_api_error)?;

    let message = match (&response.prices, &response.forecast) {
        (None, _) => "Enter a stock symbol".to_string(),
        (Some(_), None) => format!("No price data found for {}", response.symbol),
        (Some(_), Some(forecast)) => forecast.caption(),
    };
    info!("Dashboard rerun finished: {}", message);

    Ok(Json(ApiResponse {
        data: response,
        message,
        success: true,
    }))
}
