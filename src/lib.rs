pub mod config;
pub mod error;
pub mod models;
pub mod relay;

use std::sync::Arc;
use axum::{
    body::Body,
    routing::any,
    Extension,
    Router,
};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use relay::RelayState;


/// Builds the router: a single route at `config.url` accepting any method.
/// A route ending in `/` also covers every path below it.
pub fn app(state: Arc<RelayState>) -> Router<Body> {
    let route = state.config
        .subtree_route()
        .unwrap_or_else(|| state.config.url.clone());

    Router::new()
        .route(&route, any(relay::handle_upload))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}


pub async fn run(state: Arc<RelayState>) -> anyhow::Result<()> {
    // runs the webserver until ctrl-c
    let addr = state.config.listen_addr();
    let route = state.config.url.clone();

    let server = axum::Server::try_bind(&addr)?
        .serve(app(state).into_make_service())
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to await for SIGINT")
        });

    tracing::info!("Relay listening on {} (route {})", addr, route);
    server.await?;
    tracing::info!("Relay shut down");

    Ok(())
}
