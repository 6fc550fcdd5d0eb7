//! bullyclock node settings
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::config_error;
use crate::error::Result;
use crate::node::PromotionPolicy;

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const STANDARD_NODE_ID: i64 = 1;
pub const DEFAULT_NODE_ID: &str = "1";
pub const STANDARD_PORT: u16 = 50051;
pub const DEFAULT_PORT: &str = "50051";
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0";
pub const STANDARD_PROBE_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_PROBE_TIMEOUT_MS: &str = "2000";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    // This node's id, also its election priority
    pub node_id: i64,

    // Server listen address
    pub listen_address: String,

    // HTTP listen port
    pub listen_port: u16,

    // Peer addresses, `host:port`, in configured order
    pub peers: Vec<String>,

    // Per-request timeout for calls to peers
    pub probe_timeout_ms: u64,

    pub election_policy: PromotionPolicy,

    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            node_id: STANDARD_NODE_ID,
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            listen_port: STANDARD_PORT,
            peers: Vec::new(),
            probe_timeout_ms: STANDARD_PROBE_TIMEOUT_MS,
            election_policy: PromotionPolicy::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl Settings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn socket_address(&self) -> Result<SocketAddr> {
        let ip = self
            .listen_address
            .parse::<IpAddr>()
            .map_err(|err| {
                config_error!("invalid listen address {}: {}", self.listen_address, err)
            })?;
        Ok(SocketAddr::from((ip, self.listen_port)))
    }

    pub fn validate(self) -> Result<Self> {
        if self.probe_timeout_ms == 0 {
            return Err(config_error!("probe timeout must be greater than zero"));
        }
        self.socket_address()?;
        Ok(self)
    }
}

/// Split a comma-separated peer list, trimming entries and dropping empties
pub fn parse_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
