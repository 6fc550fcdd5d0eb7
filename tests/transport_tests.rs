//! HTTP transport against real nodes bound to loopback ports

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::get;
use axum::Router;
use bullyclock::api::{self, paths};
use bullyclock::node::{Node, PeerDescriptor, PeerDirectory, PromotionPolicy};
use bullyclock::transport::{HttpTransport, MemoryTransport, PeerTransport};

/// Serve a node on an ephemeral port and return its address
async fn spawn_node(id: i64) -> (Arc<Node>, SocketAddr) {
    let node = Arc::new(Node::with_transport(
        id,
        PeerDirectory::default(),
        Arc::new(MemoryTransport::default()),
        PromotionPolicy::Canonical,
    ));
    let router = api::api(node.clone()).await.unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (node, address)
}

/// An address nothing listens on
async fn closed_address() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    address
}

fn transport() -> HttpTransport {
    HttpTransport::new(1, Duration::from_millis(500)).unwrap()
}

#[tokio::test]
async fn test_probe_live_peer() {
    let (_node, address) = spawn_node(2).await;
    let peer = PeerDescriptor::new(address.to_string());
    assert!(transport().probe(&peer).await.alive);
}

#[tokio::test]
async fn test_probe_unreachable_peer() {
    let peer = PeerDescriptor::new(closed_address().await.to_string());
    assert!(!transport().probe(&peer).await.alive);
}

#[tokio::test]
async fn test_slow_peer_is_reported_down_within_timeout() {
    let router = Router::new().route(
        paths::base::STATUS,
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let transport = HttpTransport::new(1, Duration::from_millis(200)).unwrap();
    let peer = PeerDescriptor::new(address.to_string());
    let started = Instant::now();
    let result = transport.probe(&peer).await;
    let elapsed = started.elapsed();

    assert!(!result.alive);
    assert!(elapsed >= Duration::from_millis(200), "returned early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(2), "timeout not applied: {:?}", elapsed);
}

#[tokio::test]
async fn test_announce_coordinator_updates_peer() {
    let (node, address) = spawn_node(2).await;
    let peer = PeerDescriptor::new(format!("http://{}", address));

    let delivery = transport().announce_coordinator(&peer, 9).await;
    assert!(delivery.delivered);
    assert_eq!(node.election().coordinator().await, 9);
}

#[tokio::test]
async fn test_propagate_clock_updates_peer() {
    let (node, address) = spawn_node(2).await;
    let peer = PeerDescriptor::new(address.to_string());

    let delivery = transport().propagate_clock(&peer, 1).await;
    assert!(delivery.delivered);
    assert_eq!(node.clock().snapshot(), 2);
}

#[tokio::test]
async fn test_delivery_to_unreachable_peer_is_not_an_error() {
    let peer = PeerDescriptor::new(closed_address().await.to_string());
    let transport = transport();
    assert!(!transport.announce_coordinator(&peer, 1).await.delivered);
    assert!(!transport.propagate_clock(&peer, 1).await.delivered);
}

#[tokio::test]
async fn test_node_over_http_propagates_to_live_and_dead_peers() {
    let (receiver, live) = spawn_node(2).await;
    let dead = closed_address().await;
    let sender = Node::with_transport(
        1,
        PeerDirectory::new([live.to_string(), dead.to_string()]),
        Arc::new(transport()),
        PromotionPolicy::Canonical,
    );

    let (reply, round) = sender.ping();
    assert_eq!(reply, "PONG from node 1 | Lamport=1");

    let summary = round.settled().await;
    assert_eq!(summary.delivered, vec![live.to_string()]);
    assert_eq!(summary.failed, vec![dead.to_string()]);
    // receiver merged timestamp 2
    assert_eq!(receiver.clock().snapshot(), 3);
}
