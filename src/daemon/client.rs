//! Daemon WebSocket client.
//!
//! # Responsibilities
//! - Establish the socket and keep it serviced by background read/write tasks
//! - Correlate responses to in-flight requests by request id
//! - Fan service broadcasts out to any number of listeners
//! - Register this client for a service's broadcasts (`register_service`)

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, oneshot, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::daemon::message::WsMessage;
use crate::daemon::{DaemonError, DaemonResult, DAEMON_SERVICE};

/// Origin name this client reports in outgoing frames.
const CLIENT_ORIGIN: &str = "cactus_agent";

/// Broadcast frames buffered per listener before it starts lagging.
const BROADCAST_CAPACITY: usize = 256;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;
type PendingMap = Arc<Mutex<HashMap<String, oneshot::Sender<WsMessage>>>>;

/// Handle to an established daemon session.
///
/// Cheap to share by reference; all methods take `&self`. The session lives
/// until the socket closes or `close` is called, at which point every
/// in-flight and future `send` fails with [`DaemonError::Closed`].
pub struct DaemonClient {
    origin: String,
    outbound: mpsc::UnboundedSender<Message>,
    pending: PendingMap,
    broadcasts: broadcast::Sender<WsMessage>,
}

impl DaemonClient {
    /// Connect to the daemon at `url` (`ws://` or `wss://`).
    pub async fn connect(url: &str) -> DaemonResult<Self> {
        let url = Url::parse(url).map_err(|_| DaemonError::Url(url.to_string()))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(DaemonError::Url(url.to_string()));
        }

        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(DaemonError::Connect)?;
        tracing::info!(%url, "daemon session established");

        let (sink, source) = stream.split();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (broadcasts, _) = broadcast::channel(BROADCAST_CAPACITY);
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        tokio::spawn(write_loop(sink, outbound_rx));
        tokio::spawn(read_loop(source, Arc::clone(&pending), broadcasts.clone()));

        Ok(Self {
            origin: CLIENT_ORIGIN.to_string(),
            outbound,
            pending,
            broadcasts,
        })
    }

    /// Send `command` to `destination` and await the matching response frame.
    pub async fn send(
        &self,
        destination: &str,
        command: &str,
        data: serde_json::Value,
    ) -> DaemonResult<WsMessage> {
        let message = WsMessage::request(&self.origin, destination, command, data);
        let payload = serde_json::to_string(&message).map_err(|source| DaemonError::Encode {
            command: command.to_string(),
            source,
        })?;

        let (tx, rx) = oneshot::channel();
        let request_id = message.request_id.clone();
        self.pending.lock().await.insert(request_id.clone(), tx);

        if self.outbound.send(Message::Text(payload.into())).is_err() {
            self.pending.lock().await.remove(&request_id);
            return Err(DaemonError::Closed);
        }

        // The read task fulfills the oneshot, or drops it when the session ends.
        rx.await.map_err(|_| DaemonError::Closed)
    }

    /// Register for broadcasts of `service`.
    pub async fn subscribe(&self, service: &str) -> DaemonResult<()> {
        let response = self
            .send(
                DAEMON_SERVICE,
                "register_service",
                serde_json::json!({ "service": service }),
            )
            .await?;

        if response.data.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
            let message = response
                .data
                .get("error")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(DaemonError::Rejected {
                command: "register_service".to_string(),
                message,
            });
        }

        tracing::debug!(service, "registered for daemon broadcasts");
        Ok(())
    }

    /// Receiver of all broadcast frames (`ack: false`) on this session.
    pub fn messages(&self) -> broadcast::Receiver<WsMessage> {
        self.broadcasts.subscribe()
    }

    /// Ask the peer to close the socket. In-flight requests fail with
    /// `Closed` once the read task ends.
    pub fn close(&self) -> DaemonResult<()> {
        self.outbound
            .send(Message::Close(None))
            .map_err(|_| DaemonError::Closed)
    }
}

impl std::fmt::Debug for DaemonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaemonClient")
            .field("origin", &self.origin)
            .finish()
    }
}

async fn write_loop(mut sink: WsSink, mut outbound: mpsc::UnboundedReceiver<Message>) {
    while let Some(message) = outbound.recv().await {
        if let Err(error) = sink.send(message).await {
            tracing::warn!(%error, "daemon write failed");
            break;
        }
    }
    let _ = sink.close().await;
}

async fn read_loop(mut source: WsSource, pending: PendingMap, broadcasts: broadcast::Sender<WsMessage>) {
    while let Some(frame) = source.next().await {
        let message = match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<WsMessage>(text.as_str()) {
                Ok(message) => message,
                Err(error) => {
                    tracing::warn!(%error, "undecodable daemon frame");
                    continue;
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(error) => {
                tracing::warn!(%error, "daemon read failed");
                break;
            }
        };

        if message.ack {
            match pending.lock().await.remove(&message.request_id) {
                // Receiver may have given up; that is not an error here.
                Some(waiter) => {
                    let _ = waiter.send(message);
                }
                None => {
                    tracing::debug!(
                        request_id = %message.request_id,
                        command = %message.command,
                        "response for unknown request"
                    );
                }
            }
        } else {
            // No listeners is fine; broadcasts are fire-and-forget.
            let _ = broadcasts.send(message);
        }
    }

    // Dropping the waiters fails every in-flight send with Closed.
    pending.lock().await.clear();
    tracing::info!("daemon session closed");
}
