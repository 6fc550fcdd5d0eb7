use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::info;

pub mod election;
pub mod lamport_clock;
pub mod peers;

use crate::error::Result;
use crate::malformed_input;
use crate::settings::Settings;
use crate::transport::{BroadcastRound, HttpTransport, PeerTransport};
pub use election::{ElectionCoordinator, ElectionOutcome, ElectionPhase, PromotionPolicy};
pub use lamport_clock::LamportClock;
pub use peers::{parse_priority_id, PeerDescriptor, PeerDirectory};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub node: i64,
    pub lamport: u64,
    pub leader: i64,
}

/// A cluster node: owns its clock and election state and is shared by
/// every request handler.
pub struct Node {
    id: i64,
    peers: Arc<PeerDirectory>,
    clock: LamportClock,
    election: ElectionCoordinator,
    transport: Arc<dyn PeerTransport>,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("peers", &self.peers)
            .field("clock", &self.clock)
            .field("election", &self.election)
            .finish_non_exhaustive()
    }
}

impl Node {
    /// Build a node that talks to its peers over HTTP
    pub fn new(settings: &Settings) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(
            settings.node_id,
            settings.probe_timeout(),
        )?);
        Ok(Self::with_transport(
            settings.node_id,
            PeerDirectory::new(settings.peers.iter().cloned()),
            transport,
            settings.election_policy,
        ))
    }

    pub fn with_transport(
        id: i64,
        peers: PeerDirectory,
        transport: Arc<dyn PeerTransport>,
        policy: PromotionPolicy,
    ) -> Self {
        let peers = Arc::new(peers);
        info!(node = id, peers = peers.len(), policy = %policy, "node created");
        Self {
            id,
            election: ElectionCoordinator::new(id, peers.clone(), transport.clone(), policy),
            peers,
            clock: LamportClock::new(),
            transport,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn clock(&self) -> &LamportClock {
        &self.clock
    }

    pub fn election(&self) -> &ElectionCoordinator {
        &self.election
    }

    pub fn health(&self) -> String {
        format!("OK - node {}", self.id)
    }

    /// Record a local event, then push the clock to every peer.
    /// The reply carries the clock as it stood after the local event.
    pub fn ping(&self) -> (String, BroadcastRound) {
        let lamport = self.clock.local_event();
        let reply = format!("PONG from node {} | Lamport={}", self.id, lamport);
        info!(node = self.id, lamport, "ping received");
        (reply, self.propagate_clock())
    }

    /// Stamp one outbound message and send it to all peers
    pub fn propagate_clock(&self) -> BroadcastRound {
        if self.peers.is_empty() {
            return BroadcastRound::default();
        }
        let timestamp = self.clock.prepare_send();
        let transport = self.transport.clone();
        BroadcastRound::spawn_each(self.peers.peers(), move |peer| {
            let transport = transport.clone();
            async move { transport.propagate_clock(&peer, timestamp).await }
        })
    }

    /// Merge a timestamp received from a peer. Returns the new clock value.
    pub fn receive_clock(&self, body: &str) -> Result<u64> {
        let raw = body.trim();
        let remote = raw
            .parse::<u64>()
            .map_err(|err| malformed_input!("invalid timestamp {:?}: {}", raw, err))?;
        let lamport = self.clock.receive_message(remote);
        info!(node = self.id, received = remote, lamport, "clock received");
        Ok(lamport)
    }

    /// Accept a coordinator announcement from a peer
    pub async fn receive_coordinator(&self, body: &str) -> Result<i64> {
        let raw = body.trim();
        let coordinator_id = raw
            .parse::<i64>()
            .map_err(|err| malformed_input!("invalid coordinator id {:?}: {}", raw, err))?;
        self.election
            .receive_coordinator_announcement(coordinator_id)
            .await;
        Ok(coordinator_id)
    }

    /// Run an election in the background; the caller never waits on it
    pub fn trigger_election(self: &Arc<Self>) -> JoinHandle<ElectionOutcome> {
        let node = self.clone();
        tokio::spawn(async move { node.election.start_election().await })
    }

    pub async fn status(&self) -> StatusResponse {
        StatusResponse {
            node: self.id,
            lamport: self.clock.snapshot(),
            leader: self.election.coordinator().await,
        }
    }
}
