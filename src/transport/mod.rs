//! Peer transport
//!
//! `PeerTransport` is the seam between the node and the network. The HTTP
//! implementation talks to the same request surface this node serves.
pub mod broadcast;
pub mod http_transport;
pub mod memory;
pub mod traits;

pub use broadcast::{BroadcastRound, BroadcastSummary};
pub use http_transport::HttpTransport;
pub use memory::{MemoryTransport, RecordedCall};
pub use traits::{Delivery, PeerTransport, ProbeResult};
