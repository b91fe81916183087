use std::env;

use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    /// Address the HTTP listener binds to, assembled from HOST and PORT.
    pub bind_addr: String,
    /// Mailbox depth for every service channel.
    pub channel_buffer: usize,
}

/// Reads configuration from the environment, loading `.env` first if present.
/// Every value has a default so a bare `cargo run` works.
pub fn load() -> Config {
    let _ = dotenv();

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);
    let channel_buffer = env::var("CHANNEL_BUFFER")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(32);

    Config {
        bind_addr: format!("{host}:{port}"),
        channel_buffer,
    }
}
