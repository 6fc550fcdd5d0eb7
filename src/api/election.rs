use std::sync::Arc;

use axum::extract::State;
use tracing::{instrument, warn};

use crate::error::Result;
use crate::node::{ElectionOutcome, Node};

/// Start an election and acknowledge without waiting for it
#[instrument(skip(node), level = "debug")]
pub async fn election(State(node): State<Arc<Node>>) -> &'static str {
    let round = node.trigger_election();
    let node_id = node.id();
    tokio::spawn(async move {
        match round.await {
            Ok(ElectionOutcome::Promoted { announcements }) => {
                announcements.log_when_settled(node_id, "coordinator")
            }
            Ok(_) => {}
            Err(err) => warn!(node = node_id, error = %err, "election task failed"),
        }
    });
    "election triggered"
}

#[instrument(skip(node), level = "debug")]
pub async fn coordinator(State(node): State<Arc<Node>>, body: String) -> Result<&'static str> {
    node.receive_coordinator(&body).await?;
    Ok("ok")
}
