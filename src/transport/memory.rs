//! In-memory transport that records every call instead of touching the network
use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::node::peers::PeerDescriptor;

use super::traits::{Delivery, PeerTransport, ProbeResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedCall {
    Probe(String),
    Announce(String, i64),
    Propagate(String, u64),
}

/// Peers listed as alive answer probes and accept deliveries; all others
/// behave as if unreachable.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    alive: HashSet<String>,
    probe_delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MemoryTransport {
    pub fn new<I, S>(alive: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            alive: alive.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Make every probe take `delay` before answering
    pub fn with_probe_delay(mut self, delay: Duration) -> Self {
        self.probe_delay = Some(delay);
        self
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn probes(&self) -> Vec<String> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Probe(address) => Some(address.clone()),
                _ => None,
            })
            .collect()
    }

    fn is_alive(&self, peer: &PeerDescriptor) -> bool {
        self.alive.contains(peer.address())
    }
}

#[async_trait]
impl PeerTransport for MemoryTransport {
    async fn probe(&self, peer: &PeerDescriptor) -> ProbeResult {
        self.calls
            .lock()
            .await
            .push(RecordedCall::Probe(peer.address().to_string()));
        if let Some(delay) = self.probe_delay {
            tokio::time::sleep(delay).await;
        }
        ProbeResult {
            alive: self.is_alive(peer),
        }
    }

    async fn announce_coordinator(&self, peer: &PeerDescriptor, coordinator_id: i64) -> Delivery {
        self.calls.lock().await.push(RecordedCall::Announce(
            peer.address().to_string(),
            coordinator_id,
        ));
        Delivery {
            delivered: self.is_alive(peer),
        }
    }

    async fn propagate_clock(&self, peer: &PeerDescriptor, timestamp: u64) -> Delivery {
        self.calls.lock().await.push(RecordedCall::Propagate(
            peer.address().to_string(),
            timestamp,
        ));
        Delivery {
            delivered: self.is_alive(peer),
        }
    }
}
