//! Bully coordinator election
//!
//! A node probes every peer that outranks it. When none of them answers it
//! promotes itself and announces the result to all peers. Announcements
//! from other nodes always overwrite the local belief (last write wins).
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::node::peers::{PeerDescriptor, PeerDirectory};
use crate::transport::{BroadcastRound, PeerTransport, ProbeResult};

/// What to do after probing when a higher peer answered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum PromotionPolicy {
    /// Defer to any live higher peer
    #[default]
    Canonical,
    /// Promote after the probes settle regardless of what they found
    AlwaysPromote,
}

impl std::fmt::Display for PromotionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromotionPolicy::Canonical => write!(f, "canonical"),
            PromotionPolicy::AlwaysPromote => write!(f, "always-promote"),
        }
    }
}

impl std::str::FromStr for PromotionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "canonical" => Ok(PromotionPolicy::Canonical),
            "always-promote" | "always_promote" => Ok(PromotionPolicy::AlwaysPromote),
            _ => Err(format!("Invalid election policy: {}", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum ElectionPhase {
    Idle,
    Electing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ElectionState {
    pub coordinator_id: i64,
    pub phase: ElectionPhase,
}

#[derive(Debug)]
pub enum ElectionOutcome {
    /// Another round was still probing; nothing was done
    AlreadyInProgress,
    /// Higher peers answered and are expected to announce themselves
    Deferred { alive_higher: Vec<i64> },
    /// This node is now coordinator; announcements are in flight
    Promoted { announcements: BroadcastRound },
}

pub struct ElectionCoordinator {
    node_id: i64,
    peers: Arc<PeerDirectory>,
    transport: Arc<dyn PeerTransport>,
    policy: PromotionPolicy,
    state: RwLock<ElectionState>,
}

impl std::fmt::Debug for ElectionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElectionCoordinator")
            .field("node_id", &self.node_id)
            .field("peers", &self.peers)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ElectionCoordinator {
    /// The highest id among this node and its peers is presumed coordinator
    /// until an election or announcement says otherwise.
    pub fn new(
        node_id: i64,
        peers: Arc<PeerDirectory>,
        transport: Arc<dyn PeerTransport>,
        policy: PromotionPolicy,
    ) -> Self {
        let coordinator_id = peers
            .highest_priority()
            .map_or(node_id, |highest| highest.max(node_id));
        Self {
            node_id,
            peers,
            transport,
            policy,
            state: RwLock::new(ElectionState {
                coordinator_id,
                phase: ElectionPhase::Idle,
            }),
        }
    }

    pub async fn coordinator(&self) -> i64 {
        self.state.read().await.coordinator_id
    }

    pub async fn state(&self) -> ElectionState {
        *self.state.read().await
    }

    /// Run one round of the Bully protocol. Only one round probes at a time;
    /// a trigger that arrives mid-round is a no-op.
    pub async fn start_election(&self) -> ElectionOutcome {
        {
            let mut state = self.state.write().await;
            if state.phase == ElectionPhase::Electing {
                debug!(node = self.node_id, "election already in progress");
                return ElectionOutcome::AlreadyInProgress;
            }
            state.phase = ElectionPhase::Electing;
        }
        info!(node = self.node_id, policy = %self.policy, "election started");

        let alive_higher = self.probe_higher_peers().await;
        if !alive_higher.is_empty() && self.policy == PromotionPolicy::Canonical {
            self.state.write().await.phase = ElectionPhase::Idle;
            info!(node = self.node_id, higher = ?alive_higher, "deferring to higher peers");
            return ElectionOutcome::Deferred { alive_higher };
        }

        ElectionOutcome::Promoted {
            announcements: self.promote().await,
        }
    }

    /// Overwrite the coordinator belief, whatever the current phase
    pub async fn receive_coordinator_announcement(&self, coordinator_id: i64) {
        let previous = {
            let mut state = self.state.write().await;
            std::mem::replace(&mut state.coordinator_id, coordinator_id)
        };
        info!(
            node = self.node_id,
            leader = coordinator_id,
            previous,
            "coordinator announcement received"
        );
    }

    /// Probe every higher-ranked peer concurrently and wait for all of them.
    /// Returns the priority ids of the peers that answered.
    async fn probe_higher_peers(&self) -> Vec<i64> {
        let probes: Vec<(PeerDescriptor, JoinHandle<ProbeResult>)> = self
            .peers
            .higher_than(self.node_id)
            .into_iter()
            .map(|peer| {
                let transport = self.transport.clone();
                let target = peer.clone();
                let handle = tokio::spawn(async move { transport.probe(&target).await });
                (peer, handle)
            })
            .collect();

        let mut alive_higher = Vec::new();
        for (peer, handle) in probes {
            match handle.await {
                Ok(ProbeResult { alive: true }) => {
                    info!(node = self.node_id, higher = peer.priority_id(), "higher peer alive");
                    alive_higher.push(peer.priority_id());
                }
                Ok(ProbeResult { alive: false }) => {
                    debug!(node = self.node_id, peer = %peer, "higher peer down");
                }
                Err(err) => {
                    warn!(node = self.node_id, peer = %peer, error = %err, "probe task failed");
                }
            }
        }
        alive_higher
    }

    async fn promote(&self) -> BroadcastRound {
        self.state.write().await.coordinator_id = self.node_id;
        info!(node = self.node_id, "became coordinator");

        let node_id = self.node_id;
        let transport = self.transport.clone();
        // Highest-ranked peers hear first
        let announcements = BroadcastRound::spawn_each(&self.peers.ranked(), move |peer| {
            let transport = transport.clone();
            async move { transport.announce_coordinator(&peer, node_id).await }
        });

        self.state.write().await.phase = ElectionPhase::Idle;
        announcements
    }
}
