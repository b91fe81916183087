/// Configures tracing once at application startup for the entire process.
/// All services and spans use this configuration.
///
/// Filtering is environment based, so `RUST_LOG=debug` shows the per-request
/// debug logs while the default stays at `info`.
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
