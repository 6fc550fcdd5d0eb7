use std::collections::BTreeSet;

use clap::{Parser, Subcommand};
use reqwest::Client;

use bullyclock::api::paths;
use bullyclock::node::{PeerDescriptor, StatusResponse};
use bullyclock::settings::parse_peers;

#[derive(Parser)]
#[command(name = "bullyclock-admin")]
#[command(about = "bullyclock cluster administration tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show clock and leader belief of every node
    Status {
        /// Nodes to query (e.g., "node1:50051,node2:50052")
        #[arg(long)]
        nodes: String,
    },
    /// Trigger an election on one node
    Elect {
        /// Node to trigger (e.g., "node1:50051")
        #[arg(long)]
        node: String,
    },
    /// Ping one node, which also pushes its clock to its peers
    Ping {
        /// Node to ping (e.g., "node1:50051")
        #[arg(long)]
        node: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = Client::new();

    match cli.command {
        Commands::Status { nodes } => {
            cluster_status(&client, &nodes).await?;
        }
        Commands::Elect { node } => {
            let base_url = PeerDescriptor::new(node).base_url();
            let url = format!("{}{}", base_url, paths::election::ELECTION);
            let reply = client.post(&url).send().await?.error_for_status()?.text().await?;
            println!("{}", reply);
        }
        Commands::Ping { node } => {
            let url = format!("{}{}", PeerDescriptor::new(node).base_url(), paths::clock::PING);
            let reply = client.get(&url).send().await?.error_for_status()?.text().await?;
            println!("{}", reply);
        }
    }

    Ok(())
}

async fn cluster_status(client: &Client, nodes: &str) -> Result<(), Box<dyn std::error::Error>> {
    let nodes = parse_peers(nodes);
    if nodes.is_empty() {
        return Err("No nodes given".into());
    }

    let mut reports = Vec::new();
    for node in &nodes {
        let base_url = PeerDescriptor::new(node.as_str()).base_url();
        let url = format!("{}{}", base_url, paths::base::STATUS);
        match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<StatusResponse>().await {
                    Ok(status) => {
                        println!(
                            "{}: node={} lamport={} leader={}",
                            node, status.node, status.lamport, status.leader
                        );
                        reports.push(status);
                    }
                    Err(e) => println!("{}: invalid status response ({})", node, e),
                }
            }
            Ok(response) => println!("{}: HTTP {}", node, response.status()),
            Err(e) => println!("{}: unreachable ({})", node, e),
        }
    }

    match leader_agreement(&reports) {
        Some(leader) => println!(
            "All {} reachable nodes agree: leader is {}",
            reports.len(),
            leader
        ),
        None if reports.is_empty() => println!("No node could be reached"),
        None => println!("Nodes disagree on the leader: {:?}", leaders(&reports)),
    }
    Ok(())
}

fn leaders(reports: &[StatusResponse]) -> BTreeSet<i64> {
    reports.iter().map(|status| status.leader).collect()
}

/// The leader every report names, if they all name the same one
fn leader_agreement(reports: &[StatusResponse]) -> Option<i64> {
    let leaders = leaders(reports);
    if leaders.len() == 1 {
        leaders.into_iter().next()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(node: i64, leader: i64) -> StatusResponse {
        StatusResponse {
            node,
            lamport: 0,
            leader,
        }
    }

    #[test]
    fn test_leader_agreement() {
        assert_eq!(leader_agreement(&[status(1, 3), status(2, 3), status(3, 3)]), Some(3));
        assert_eq!(leader_agreement(&[status(1, 3), status(2, 2)]), None);
        assert_eq!(leader_agreement(&[]), None);
    }
}
