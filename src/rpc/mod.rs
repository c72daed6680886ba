//! Service RPC bindings.
//!
//! # Data Flow
//! ```text
//! caller → rpc::wallet::get_wallet_balance(&agent, req)
//!     → RpcAgent::send("get_wallet_balance", &req)
//!     → POST https://<self_hostname>:<rpc_port>/get_wallet_balance
//!     → response envelope {success, error?, ...payload}
//!     → typed response struct (or RpcError::Api on success: false)
//! ```
//!
//! # Design Decisions
//! - One thin async wrapper per node command; serialization is pass-through,
//!   no request validation on the client side
//! - Endpoint host, port and mutual-TLS credentials come out of the flattened
//!   config, which is where the config core gets exercised
//! - Deep node-internal payloads (proofs, spend bundles) stay untyped
//!   `serde_json::Value` — they are opaque to this client

pub mod agent;
pub mod common;
pub mod farmer;
pub mod harvester;
pub mod wallet;

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

pub use agent::{RpcAgent, RpcEndpoint};

/// RPC-capable node services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    FullNode,
    Farmer,
    Harvester,
    Wallet,
}

impl Service {
    /// Top-level config section holding this service's settings.
    pub fn config_section(&self) -> &'static str {
        match self {
            Service::FullNode => "full_node",
            Service::Farmer => "farmer",
            Service::Harvester => "harvester",
            Service::Wallet => "wallet",
        }
    }

    /// Service name used as a WebSocket routing destination.
    pub fn ws_name(&self) -> &'static str {
        match self {
            Service::FullNode => "cactus_full_node",
            Service::Farmer => "cactus_farmer",
            Service::Harvester => "cactus_harvester",
            Service::Wallet => "cactus_wallet",
        }
    }
}

/// Errors that can occur during RPC operations.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Endpoint host/port did not form a valid URL.
    #[error("invalid RPC endpoint: {0}")]
    Endpoint(String),

    /// Client credential file missing or unreadable.
    #[error("failed to read client credential {path}: {source}")]
    Credentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TLS client construction failed.
    #[error("TLS client setup failed: {0}")]
    Tls(#[source] reqwest::Error),

    /// Request could not be sent or the response body not read.
    #[error("request {command} failed: {source}")]
    Transport {
        command: String,
        #[source]
        source: reqwest::Error,
    },

    /// The node answered with `success: false`.
    #[error("node rejected {command}: {message}")]
    Api { command: String, message: String },

    /// The response payload did not match the expected shape.
    #[error("unexpected response to {command}: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// Endpoint construction failed while reading the config.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
