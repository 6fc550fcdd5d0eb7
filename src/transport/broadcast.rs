use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::node::peers::PeerDescriptor;

use super::traits::Delivery;

/// One outbound call per peer, each running as its own task.
///
/// Dropping a round detaches its calls; they still run to completion.
#[derive(Debug, Default)]
pub struct BroadcastRound {
    calls: Vec<(String, JoinHandle<Delivery>)>,
}

/// Which peers a settled round reached
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BroadcastSummary {
    pub delivered: Vec<String>,
    pub failed: Vec<String>,
}

impl BroadcastRound {
    /// Spawn `send` once for every peer. Calls are independent: one peer
    /// failing never delays delivery to another.
    pub fn spawn_each<F, Fut>(peers: &[PeerDescriptor], send: F) -> Self
    where
        F: Fn(PeerDescriptor) -> Fut,
        Fut: Future<Output = Delivery> + Send + 'static,
    {
        let calls = peers
            .iter()
            .map(|peer| (peer.address().to_string(), tokio::spawn(send(peer.clone()))))
            .collect();
        Self { calls }
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Wait for every call in the round to finish
    pub async fn settled(self) -> BroadcastSummary {
        let mut summary = BroadcastSummary::default();
        for (address, handle) in self.calls {
            match handle.await {
                Ok(Delivery { delivered: true }) => summary.delivered.push(address),
                Ok(Delivery { delivered: false }) => summary.failed.push(address),
                Err(err) => {
                    warn!(peer = %address, error = %err, "broadcast task did not complete");
                    summary.failed.push(address);
                }
            }
        }
        summary
    }

    /// Wait for the round in the background and log how it went
    pub fn log_when_settled(self, node_id: i64, kind: &'static str) {
        if self.is_empty() {
            return;
        }
        tokio::spawn(async move {
            let summary = self.settled().await;
            debug!(
                node = node_id,
                kind,
                delivered = summary.delivered.len(),
                failed = summary.failed.len(),
                "broadcast round settled"
            );
        });
    }
}
