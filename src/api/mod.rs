mod base;
mod clock;
mod election;

use std::borrow::Cow;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    error_handling::HandleErrorLayer, http::StatusCode, response::IntoResponse, routing, Router,
};
use tokio::time::Duration;
use tower::{BoxError, ServiceBuilder};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod paths;

pub use base::AboutResponse;

use crate::error::Result;
use crate::node::Node;

/// Build the request surface for a node
pub async fn api(node: Arc<Node>) -> Result<Router> {
    let api = Router::new()
        .route(paths::base::HEALTH, routing::get(base::health))
        .route(paths::base::ABOUT, routing::get(base::about))
        .route(paths::base::STATUS, routing::get(base::status))
        // Lamport clock
        .route(paths::clock::PING, routing::get(clock::ping))
        .route(paths::clock::RECEIVE, routing::post(clock::receive))
        // Coordinator election
        .route(
            paths::election::ELECTION,
            routing::get(election::election).post(election::election),
        )
        .route(paths::election::COORDINATOR, routing::post(election::coordinator))
        .layer(
            ServiceBuilder::new()
                // Handle errors from middleware
                .layer(HandleErrorLayer::new(handle_error))
                .load_shed()
                .timeout(Duration::from_secs(10)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(node);

    Ok(api)
}

/// Bind `address` and serve the node until the server stops
pub async fn serve(node: Arc<Node>, address: SocketAddr) -> Result<()> {
    let node_id = node.id();
    let router = api(node).await?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(node = node_id, address = %address, "node started");
    axum::serve(listener, router).await?;
    Ok(())
}

async fn handle_error(error: BoxError) -> impl IntoResponse {
    if error.is::<tower::timeout::error::Elapsed>() {
        return (StatusCode::REQUEST_TIMEOUT, Cow::from("request timed out"));
    }

    if error.is::<tower::load_shed::error::Overloaded>() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Cow::from("service is overloaded, try again later"),
        );
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Cow::from(format!("Unhandled internal error: {}", error)),
    )
}
