//! Learning scheduler API server.
//!
//! Turns a learning goal (topic, total duration, daily commitment) into a
//! study schedule generated by Gemini, and suggests tutorial videos for the
//! topic.
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY`: required by the schedule endpoints
//! - `YOUTUBE_API_KEY`: required by the video endpoint
//! - `HOST` / `PORT`: bind address (default 0.0.0.0:8000)
//! - `RUST_LOG`: log filter (default info)
//!
//! A `.env` file in the working directory is read first if present.

mod config;
mod duration;
mod gemini;
mod granularity;
mod http;
mod models;
mod prompt;
mod reassembler;
mod youtube;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = Config::from_env()?;
    info!(?config, "Starting learning scheduler");

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set; schedule endpoints will fail until it is configured");
    }
    if config.youtube_api_key.is_none() {
        warn!("YOUTUBE_API_KEY not set; video search will fail until it is configured");
    }

    let state = AppState::from_config(&config);
    let app = create_router(state, &config.static_dir);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
