//! Daemon message envelope.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Envelope of every frame exchanged with the daemon.
///
/// A request carries `ack: false` and a fresh `request_id`; the daemon
/// answers with `ack: true` and the same id. Frames originated by a service
/// (broadcasts) also arrive with `ack: false`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WsMessage {
    pub command: String,
    pub ack: bool,
    pub origin: String,
    pub destination: String,
    pub request_id: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl WsMessage {
    /// Build a request frame with a fresh id.
    pub fn request(
        origin: impl Into<String>,
        destination: impl Into<String>,
        command: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            command: command.into(),
            ack: false,
            origin: origin.into(),
            destination: destination.into(),
            request_id: new_request_id(),
            data,
        }
    }
}

/// 32 random bytes, hex-encoded — the id format the daemon echoes back.
pub(crate) fn new_request_id() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}
