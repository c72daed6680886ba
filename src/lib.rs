//! Client bindings for a cactus node.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌────────────────────────────────────────────┐
//!                  │                cactus-agent                │
//!                  │                                            │
//!   CACTUS_ROOT ───┼─▶ config::resolver ─▶ config::loader       │
//!                  │        │                   │ (memoized)    │
//!                  │        ▼                   ▼               │
//!                  │   derived paths        FlatConfig          │
//!                  │   (ssl, log, ...)    /a/b/c → scalar       │
//!                  │        │                   │               │
//!                  │        └───────┬───────────┘               │
//!                  │                ▼                           │
//!                  │     rpc::RpcEndpoint ─▶ rpc::RpcAgent ─────┼──▶ service RPC
//!                  │                                            │    (HTTPS, mTLS)
//!                  │     daemon::DaemonClient ──────────────────┼──▶ daemon
//!                  │       requests + broadcasts                │    (WebSocket)
//!                  └────────────────────────────────────────────┘
//! ```
//!
//! The config subsystem resolves the node root directory, flattens
//! `config.yaml` into canonical `/`-delimited paths and memoizes the result;
//! the RPC and daemon modules are thin typed bindings over the node's wire
//! surfaces, configured from that flattened view.

pub mod config;
pub mod daemon;
pub mod rpc;

pub use config::{ConfigError, ConfigLoader, FlatConfig, ResolverContext, Scalar};
pub use daemon::{DaemonClient, DaemonError};
pub use rpc::{RpcAgent, RpcEndpoint, RpcError, Service};
