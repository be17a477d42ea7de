use std::sync::Arc;

use anyhow::Context;

use hearth_api::app;
use hearth_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hearth_observability::init();

    // Startup failures (missing signing key, unreachable policy store) are
    // fatal here; per-request failures never are.
    let config = AppConfig::load()?;
    let services = Arc::new(app::services::build_services(&config).await?);
    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
