//! Daemon WebSocket session.
//!
//! # Data Flow
//! ```text
//! DaemonClient::connect(wss://host:daemon_port)
//!     ├─ write task ← mpsc ← send()/close()
//!     └─ read task ── ack frames ──→ pending request map (oneshot per id)
//!                 └── broadcasts ──→ broadcast channel → messages()/plotter
//! ```
//!
//! # Design Decisions
//! - Requests carry a random hex id; the read task matches responses by id,
//!   so any number of requests can be in flight on one socket
//! - Broadcasts (`ack: false`) fan out on a lossy broadcast channel; a slow
//!   listener lags rather than stalling the socket
//! - Closing the socket fails every in-flight request with `Closed`

pub mod client;
pub mod message;
pub mod plotter;

use thiserror::Error;

pub use client::DaemonClient;
pub use message::WsMessage;

/// Routing destination of the daemon itself.
pub const DAEMON_SERVICE: &str = "daemon";

/// Errors that can occur on the daemon session.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Not a usable `ws://`/`wss://` URL.
    #[error("invalid daemon url: {0}")]
    Url(String),

    /// WebSocket handshake failed.
    #[error("failed to connect to daemon: {0}")]
    Connect(#[source] tokio_tungstenite::tungstenite::Error),

    /// Outgoing message could not be serialized.
    #[error("failed to encode {command}: {source}")]
    Encode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// The session ended before the request was answered.
    #[error("daemon session closed")]
    Closed,

    /// The daemon answered with `success: false`.
    #[error("daemon rejected {command}: {message}")]
    Rejected { command: String, message: String },
}

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;
