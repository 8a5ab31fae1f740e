mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::LocatorConfig;
use crate::location::LocatorError;
use crate::locator::BarberLocator;

pub fn build_router(config: LocatorConfig) -> Result<Router, LocatorError> {
    let locator = BarberLocator::new(config.resolver()?, config.default_center);
    let state = Arc::new(AppState::new(locator, config));

    Ok(Router::new()
        .route("/api/resolve", get(handlers::resolve))
        .route("/api/nearby", post(handlers::nearby))
        .route("/api/gazetteer", get(handlers::gazetteer))
        .route("/api/radii", get(handlers::radii))
        .layer(CorsLayer::permissive())
        .with_state(state))
}

pub async fn start(config: LocatorConfig, host: &str, port: u16) -> Result<(), LocatorError> {
    let app = build_router(config)?;
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| LocatorError::Server {
            addr: addr.clone(),
            source,
        })?;

    eprintln!("  barber-locator listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .await
        .map_err(|source| LocatorError::Server { addr, source })
}
