use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, info, trace};

use crate::config::{AppConfig, initialize_app_state};
use crate::router::create_router;

/// Runs the dashboard server until it stops.
pub async fn serve(config: &AppConfig) -> Result<()> {
    trace!("Entering serve function");
    debug!("Configuration: {:?}", config);

    let state = initialize_app_state(config).context("failed to initialize application state")?;
    info!(
        "Using {} price provider at {}",
        state.provider.name(),
        config.provider_url
    );

    let static_dir = config.existing_static_dir();
    if static_dir.is_none() {
        info!(
            "No frontend build at {}, serving the API only",
            config.static_dir.display()
        );
    }
    let app = create_router(state, static_dir.as_deref());

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_address))?;

    info!("Stockcast dashboard on http://{}", config.bind_address);
    info!("Swagger UI on http://{}/swagger-ui", config.bind_address);

    axum::serve(listener, app).await.context("server error")?;

    info!("Server shut down");
    Ok(())
}
