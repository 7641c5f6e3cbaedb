//! Rock-paper-scissors escrow game service
//!
//! Exposes the commit-reveal game engine over HTTP, backed by a mock escrow host.

mod config;
mod handlers;
mod models;
mod state;

#[cfg(test)]
mod tests;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::ServerConfig;
use handlers::*;
use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Players
        .route("/api/players", post(register_player))
        .route("/api/players/:id", get(get_player))
        .route("/api/withdraw", post(withdraw))
        // Games
        .route("/api/games", post(start_game))
        .route("/api/games", get(list_open_games))
        .route("/api/games/:id", get(get_game))
        .route("/api/games/:id/decline", post(decline_game))
        .route("/api/games/:id/join", post(join_game))
        .route("/api/games/:id/move1", post(first_move))
        .route("/api/games/:id/move2", post(second_move))
        .route("/api/games/:id/reveal", post(reveal_move))
        .route("/api/games/:id/claim", post(claim_game))
        .route("/api/commitment", post(commitment))
        // System
        .route("/api/system/tick", post(tick))
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    if config.deploy_flag {
        tracing::info!("Deploy flag set");
    }
    let state = AppState::new(&config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("RPS game service starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await
}
