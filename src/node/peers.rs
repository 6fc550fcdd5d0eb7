use serde::{Deserialize, Serialize};

/// Priority given to addresses that carry no usable numeric id
pub const UNRANKED: i64 = -1;

/// Derive a peer's election priority from its address.
///
/// An optional `scheme://` is skipped, the host is the text before the
/// first `:`, and after the leading run of non-digit characters the rest
/// of the host must be a decimal integer. Anything else is `UNRANKED`.
pub fn parse_priority_id(address: &str) -> i64 {
    let without_scheme = match address.split_once("://") {
        Some((_, rest)) => rest,
        None => address,
    };
    let host = without_scheme.split(':').next().unwrap_or_default();
    let digits = host.trim_start_matches(|c: char| !c.is_ascii_digit());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return UNRANKED;
    }
    digits.parse::<i64>().unwrap_or(UNRANKED)
}

/// A configured peer and its derived priority
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct PeerDescriptor {
    address: String,
    priority_id: i64,
}

impl PeerDescriptor {
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();
        let priority_id = parse_priority_id(&address);
        Self {
            address,
            priority_id,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn priority_id(&self) -> i64 {
        self.priority_id
    }

    /// Base URL for requests to this peer
    pub fn base_url(&self) -> String {
        let address = self.address.trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        }
    }
}

impl std::fmt::Display for PeerDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// The configured peer list, fixed at startup
#[derive(Clone, Debug, Default)]
pub struct PeerDirectory {
    peers: Vec<PeerDescriptor>,
}

impl PeerDirectory {
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            peers: addresses.into_iter().map(PeerDescriptor::new).collect(),
        }
    }

    /// Peers in configured order
    pub fn peers(&self) -> &[PeerDescriptor] {
        &self.peers
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Peers by priority, highest first. Equal priorities keep configured order.
    pub fn ranked(&self) -> Vec<PeerDescriptor> {
        let mut ranked = self.peers.clone();
        // sort_by is stable: first listed wins a tie
        ranked.sort_by(|a, b| b.priority_id.cmp(&a.priority_id));
        ranked
    }

    /// Peers that outrank `id`, highest first
    pub fn higher_than(&self, id: i64) -> Vec<PeerDescriptor> {
        self.ranked()
            .into_iter()
            .filter(|peer| peer.priority_id > id)
            .collect()
    }

    /// Highest priority among configured peers, if any
    pub fn highest_priority(&self) -> Option<i64> {
        self.peers.iter().map(PeerDescriptor::priority_id).max()
    }
}
