//! Transport traits for best-effort peer communication
//!
//! Every call reports its outcome as a plain value. Failures are logged by
//! the implementation and never surface as errors to the caller.

use async_trait::async_trait;

use crate::node::peers::PeerDescriptor;

/// Result of a liveness probe
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeResult {
    pub alive: bool,
}

/// Result of a best-effort notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: bool,
}

/// Outbound calls a node makes to its peers
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Check whether a peer answers its status endpoint
    async fn probe(&self, peer: &PeerDescriptor) -> ProbeResult;

    /// Tell a peer who the coordinator is
    async fn announce_coordinator(&self, peer: &PeerDescriptor, coordinator_id: i64) -> Delivery;

    /// Send this node's logical timestamp to a peer
    async fn propagate_clock(&self, peer: &PeerDescriptor, timestamp: u64) -> Delivery;
}
