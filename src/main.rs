use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bullyclock::api;
use bullyclock::cli;
use bullyclock::node::Node;
use bullyclock::settings::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args and env vars
    let settings = cli::Cli::parse().into_settings()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bullyclock=debug,tower_http=debug".into());
    match settings.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    let socket_address = settings.socket_address()?;
    info!(
        node = settings.node_id,
        peers = ?settings.peers,
        port = settings.listen_port,
        "starting"
    );

    let node = Arc::new(Node::new(&settings)?);
    // Failing to bind is fatal
    api::serve(node, socket_address).await?;

    Ok(())
}
