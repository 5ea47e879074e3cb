use axum::{extract::State, response::Json};
use tracing::{debug, instrument};
use crate::schemas::{AppState, HealthResponse};

/// Liveness of the server and its price cache
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    )
)]
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache_entries = state.cache.entry_count();
    debug!("Health check, {} cached price tables", cache_entries);

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.provider.name().to_string(),
        cache_entries,
    })
}
