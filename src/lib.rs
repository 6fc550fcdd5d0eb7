//! A cluster node that keeps a Lamport clock and elects a coordinator with
//! the Bully algorithm.
pub mod api;
pub mod cli;
pub mod error;
pub mod node;
pub mod settings;
pub mod transport;
