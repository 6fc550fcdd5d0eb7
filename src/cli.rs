//! CLI for this application
//!
use crate::error::Result;
use crate::node::PromotionPolicy;
use crate::settings::{self, LogFormat};

#[derive(Clone, Debug, clap::Parser)]
#[command(name = "bullyclock", version, about = "Lamport-clocked node with Bully election")]
pub struct Cli {
    // This node's id and election priority
    #[clap(
        long,
        default_value = settings::DEFAULT_NODE_ID,
        env("NODE_ID"),
        help = "Numeric id of this node"
    )]
    pub node_id: i64,

    // Server listen address
    #[clap(
        long,
        default_value = settings::DEFAULT_LISTEN_ADDRESS,
        env("LISTEN_ADDRESS"),
        help = "IP Address to listen on"
    )]
    pub listen_address: String,

    // HTTP API listen port
    #[clap(
        long,
        default_value = settings::DEFAULT_PORT,
        env("PORT"),
        help = "Port to bind the HTTP API to"
    )]
    pub port: u16,

    // Cluster configuration information: peers
    #[clap(
        long,
        default_value = "",
        env("PEERS"),
        help = "Comma-separated peer addresses (e.g., node2:50052,node3:50053)"
    )]
    pub peers: String,

    // Timeout for every call made to a peer
    #[clap(
        long,
        default_value = settings::DEFAULT_PROBE_TIMEOUT_MS,
        env("PROBE_TIMEOUT_MS"),
        help = "Milliseconds before a peer call is treated as failed"
    )]
    pub probe_timeout_ms: u64,

    #[clap(
        long,
        default_value = "canonical",
        env("ELECTION_POLICY"),
        help = "election-policy: 'canonical' or 'always-promote'"
    )]
    pub election_policy: PromotionPolicy,

    #[clap(
        long,
        default_value = "pretty",
        env("LOG_FORMAT"),
        help = "log-format: 'pretty' or 'json'"
    )]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn into_settings(self) -> Result<settings::Settings> {
        settings::Settings {
            node_id: self.node_id,
            listen_address: self.listen_address,
            listen_port: self.port,
            peers: settings::parse_peers(&self.peers),
            probe_timeout_ms: self.probe_timeout_ms,
            election_policy: self.election_policy,
            log_format: self.log_format,
        }
        .validate()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_flags_into_settings() {
        let cli = Cli::try_parse_from([
            "bullyclock",
            "--node-id",
            "3",
            "--port",
            "50053",
            "--peers",
            "node1:50051, node2:50052",
            "--election-policy",
            "always-promote",
            "--log-format",
            "json",
        ])
        .unwrap();
        let settings = cli.into_settings().unwrap();
        assert_eq!(settings.node_id, 3);
        assert_eq!(settings.listen_port, 50053);
        assert_eq!(settings.peers, vec!["node1:50051", "node2:50052"]);
        assert_eq!(settings.election_policy, PromotionPolicy::AlwaysPromote);
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let cli = Cli::try_parse_from(["bullyclock", "--probe-timeout-ms", "0"]).unwrap();
        assert!(cli.into_settings().is_err());
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        assert!(Cli::try_parse_from(["bullyclock", "--election-policy", "random"]).is_err());
    }
}
