use tracing::{error, info};

use storefront::app_system::{setup_tracing, StoreSystem};
use storefront::http::{router, AppState};
use storefront::{config, seed};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = config::load();

    info!("Starting storefront");

    let system = StoreSystem::new(config.channel_buffer);
    seed::seed_demo_data(&system).await?;

    let app = router(AppState::new(&system));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| e.to_string())?;
    info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| e.to_string())?;

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Storefront stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
