use crate::handlers::{
    dashboard::get_dashboard, forecast::get_forecast, health::health_check, prices::get_prices,
    symbols::get_symbols,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{Router, routing::get};
use std::path::Path;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
///
/// With a `static_dir` the built frontend is served for every path no API
/// route matches, falling back to its `index.html`.
pub fn create_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Market data
        .route("/api/v1/symbols", get(get_symbols))
        .route("/api/v1/prices", get(get_prices))
        // Forecast
        .route("/api/v1/forecast", get(get_forecast))
        .route("/api/v1/dashboard", get(get_dashboard))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if let Some(dir) = static_dir {
        info!("Serving frontend from {}", dir.display());
        let index = ServeFile::new(dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(dir).not_found_service(index));
    }

    router
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
