use axum::response::Json;
use common::SymbolList;
use tracing::instrument;

use crate::schemas::ApiResponse;

/// Ticker symbols suggested next to the symbol input
#[utoipa::path(
    get,
    path = "/api/v1/symbols",
    tag = "market",
    responses(
        (status = 200, description = "Suggested symbols", body = ApiResponse<SymbolList>)
    )
)]
#[instrument]
pub async fn get_symbols() -> Json<ApiResponse<SymbolList>> {
    Json(ApiResponse {
        data: SymbolList::default(),
        message: "Symbols retrieved successfully".to_string(),
        success: true,
    })
}
