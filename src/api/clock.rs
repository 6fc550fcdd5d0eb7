use std::sync::Arc;

use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::node::Node;

/// Reply right away; the clock broadcast finishes in the background
#[instrument(skip(node), level = "debug")]
pub async fn ping(State(node): State<Arc<Node>>) -> String {
    let (reply, round) = node.ping();
    round.log_when_settled(node.id(), "clock");
    reply
}

#[instrument(skip(node), level = "debug")]
pub async fn receive(State(node): State<Arc<Node>>, body: String) -> Result<String> {
    let lamport = node.receive_clock(&body)?;
    Ok(format!("ACK node {} lamport={}", node.id(), lamport))
}
