use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::api::paths;
use crate::error::Result;
use crate::node::peers::PeerDescriptor;

use super::traits::{Delivery, PeerTransport, ProbeResult};

/// HTTP transport backed by one shared `reqwest::Client`
#[derive(Clone, Debug)]
pub struct HttpTransport {
    node_id: i64,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Every request made through this transport gives up after `timeout`
    pub fn new(node_id: i64, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { node_id, client })
    }

    async fn post_text(&self, peer: &PeerDescriptor, path: &str, body: String) -> Delivery {
        let url = format!("{}{}", peer.base_url(), path);
        match self.client.post(&url).body(body).send().await {
            Ok(resp) if resp.status().is_success() => {
                let status = resp.status().as_u16();
                info!(node = self.node_id, to = %url, status, "message sent");
                Delivery { delivered: true }
            }
            Ok(resp) => {
                let status = resp.status().as_u16();
                warn!(node = self.node_id, to = %url, status, "peer rejected message");
                Delivery { delivered: false }
            }
            Err(err) => {
                warn!(node = self.node_id, to = %url, error = %err, "peer unreachable");
                Delivery { delivered: false }
            }
        }
    }
}

#[async_trait]
impl PeerTransport for HttpTransport {
    async fn probe(&self, peer: &PeerDescriptor) -> ProbeResult {
        let url = format!("{}{}", peer.base_url(), paths::base::STATUS);
        match self.client.get(&url).send().await {
            Ok(resp) => ProbeResult {
                alive: resp.status().is_success(),
            },
            Err(err) => {
                warn!(node = self.node_id, peer = %peer, error = %err, "probe failed");
                ProbeResult { alive: false }
            }
        }
    }

    async fn announce_coordinator(&self, peer: &PeerDescriptor, coordinator_id: i64) -> Delivery {
        self.post_text(peer, paths::election::COORDINATOR, coordinator_id.to_string())
            .await
    }

    async fn propagate_clock(&self, peer: &PeerDescriptor, timestamp: u64) -> Delivery {
        self.post_text(peer, paths::clock::RECEIVE, timestamp.to_string())
            .await
    }
}
