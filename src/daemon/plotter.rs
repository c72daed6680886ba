//! Plotter service broadcasts (`cactus_plotter`).
//!
//! The plotter pushes its whole queue on every state or log change; this
//! module types those frames and narrows a session's broadcast stream down
//! to them.

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};

use crate::daemon::message::WsMessage;
use crate::daemon::{DaemonClient, DaemonResult};

/// Service name of the plotter daemon child process.
pub const PLOTTER_SERVICE: &str = "cactus_plotter";

const STATE_CHANGED_COMMAND: &str = "state_changed";

/// One job in the plotter queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotQueueEntry {
    pub id: String,
    pub queue: String,
    /// Plot k-size.
    pub size: u32,
    pub parallel: bool,
    pub delay: u64,
    pub state: String,
    pub error: Option<String>,
    pub deleted: bool,
    pub log: Option<String>,
    pub log_new: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotEventKind {
    LogChanged,
    StateChanged,
}

/// Payload of a plotter `state_changed` broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotStateChanged {
    pub state: PlotEventKind,
    pub queue: Vec<PlotQueueEntry>,
}

/// Subscribe to the plotter and return a stream of its queue events.
///
/// Frames from other services and undecodable payloads are filtered out; the
/// stream ends when the daemon session closes or the receiver is dropped.
pub async fn plot_state_changes(
    client: &DaemonClient,
) -> DaemonResult<mpsc::UnboundedReceiver<PlotStateChanged>> {
    client.subscribe(PLOTTER_SERVICE).await?;

    let mut messages = client.messages();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match messages.recv().await {
                Ok(message) => {
                    if let Some(event) = decode_event(&message) {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "plotter event listener lagging");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    Ok(rx)
}

fn decode_event(message: &WsMessage) -> Option<PlotStateChanged> {
    if message.origin != PLOTTER_SERVICE || message.command != STATE_CHANGED_COMMAND {
        return None;
    }
    match serde_json::from_value(message.data.clone()) {
        Ok(event) => Some(event),
        Err(error) => {
            tracing::warn!(%error, "undecodable plotter broadcast");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::message::new_request_id;
    use serde_json::json;

    fn plotter_frame(data: serde_json::Value) -> WsMessage {
        WsMessage {
            command: STATE_CHANGED_COMMAND.to_string(),
            ack: false,
            origin: PLOTTER_SERVICE.to_string(),
            destination: "cactus_agent".to_string(),
            request_id: new_request_id(),
            data,
        }
    }

    #[test]
    fn decodes_state_changed_broadcast() {
        let frame = plotter_frame(json!({
            "state": "state_changed",
            "queue": [{
                "id": "plot-1",
                "queue": "default",
                "size": 32,
                "parallel": false,
                "delay": 0,
                "state": "RUNNING",
                "error": null,
                "deleted": false,
                "log": "Starting phase 1/4",
                "log_new": "Starting phase 1/4",
            }],
        }));

        let event = decode_event(&frame).unwrap();
        assert_eq!(event.state, PlotEventKind::StateChanged);
        assert_eq!(event.queue.len(), 1);
        assert_eq!(event.queue[0].state, "RUNNING");
    }

    #[test]
    fn ignores_frames_from_other_services() {
        let mut frame = plotter_frame(json!({"state": "log_changed", "queue": []}));
        frame.origin = "cactus_wallet".to_string();
        assert!(decode_event(&frame).is_none());
    }

    #[test]
    fn ignores_undecodable_payloads() {
        let frame = plotter_frame(json!({"state": "unknown_kind", "queue": []}));
        assert!(decode_event(&frame).is_none());
    }
}
