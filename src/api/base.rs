use std::sync::Arc;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::node::{Node, StatusResponse};
use crate::settings::{APP_NAME, APP_VERSION};

pub async fn health(State(node): State<Arc<Node>>) -> String {
    node.health()
}

#[derive(Serialize, Deserialize)]
pub struct AboutResponse {
    name: String,
    version: String,
}

impl Default for AboutResponse {
    fn default() -> Self {
        Self {
            name: APP_NAME.to_string(),
            version: APP_VERSION.to_string(),
        }
    }
}

#[instrument]
pub async fn about() -> axum::Json<AboutResponse> {
    axum::Json(AboutResponse::default())
}

#[instrument(skip(node), level = "debug")]
pub async fn status(State(node): State<Arc<Node>>) -> axum::Json<StatusResponse> {
    axum::Json(node.status().await)
}
