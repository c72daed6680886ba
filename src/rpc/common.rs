//! Commands shared by every RPC service.
//!
//! These are served on all service ports: connection management, route
//! listing and liveness.

use serde::{Deserialize, Serialize};

use crate::rpc::agent::{EmptyResponse, RpcAgent};
use crate::rpc::RpcResult;

/// One entry of the node's peer connection table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub node_id: String,
    /// Numeric node type (full node, farmer, wallet, ...).
    #[serde(rename = "type")]
    pub node_type: u8,
    pub peer_host: String,
    pub peer_port: u16,
    pub peer_server_port: Option<u16>,
    pub local_port: u16,
    pub creation_time: Option<f64>,
    pub last_message_time: Option<f64>,
    pub bytes_read: Option<u64>,
    pub bytes_written: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetConnectionsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetConnectionsResponse {
    pub connections: Vec<ConnectionInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenConnectionRequest {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct CloseConnectionRequest {
    pub node_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetRoutesResponse {
    pub routes: Vec<String>,
}

pub async fn get_connections(
    agent: &RpcAgent,
    params: &GetConnectionsRequest,
) -> RpcResult<GetConnectionsResponse> {
    agent.send("get_connections", params).await
}

pub async fn open_connection(
    agent: &RpcAgent,
    params: &OpenConnectionRequest,
) -> RpcResult<EmptyResponse> {
    agent.send("open_connection", params).await
}

pub async fn close_connection(
    agent: &RpcAgent,
    params: &CloseConnectionRequest,
) -> RpcResult<EmptyResponse> {
    agent.send("close_connection", params).await
}

pub async fn stop_node(agent: &RpcAgent) -> RpcResult<EmptyResponse> {
    agent.send_command("stop_node").await
}

pub async fn get_routes(agent: &RpcAgent) -> RpcResult<GetRoutesResponse> {
    agent.send_command("get_routes").await
}

pub async fn healthz(agent: &RpcAgent) -> RpcResult<EmptyResponse> {
    agent.send_command("healthz").await
}
