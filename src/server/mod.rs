pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::{Config, ServerConfig},
    upstream::ChatbotClient,
};
use axum::{Router, routing::any};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Builds the relay router: one route, any method.
pub fn router(server: &ServerConfig, client: Arc<dyn ChatbotClient>) -> Router {
    let app = Router::new()
        .route(&server.path, any(handlers::relay))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(client));

    if server.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

pub async fn run(config: Config, client: Arc<dyn ChatbotClient>) -> Result<()> {
    let app = router(&config.server, client);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {} (path {})", addr, config.server.path);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
