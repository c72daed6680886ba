//! Farmer service commands (`cactus_farmer`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rpc::agent::{EmptyResponse, RpcAgent};
use crate::rpc::RpcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignagePoint {
    pub challenge_hash: String,
    pub challenge_chain_sp: String,
    pub reward_chain_sp: String,
    pub difficulty: u64,
    pub sub_slot_iters: u64,
    pub signage_point_index: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetSignagePointRequest {
    pub sp_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetSignagePointResponse {
    pub signage_point: SignagePoint,
    /// Pairs of plot identifier and proof of space; opaque to this client.
    pub proofs: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetSignagePointsResponse {
    pub signage_points: Vec<GetSignagePointResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetRewardTargetsRequest {
    pub search_for_private_key: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetRewardTargetsResponse {
    pub farmer_target: String,
    pub pool_target: String,
    /// Present only when the request asked to search for private keys.
    pub have_farmer_sk: Option<bool>,
    pub have_pool_sk: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SetRewardTargetsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_target: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetPoolStateResponse {
    pub pool_state: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetPayoutInstructionsRequest {
    pub launcher_id: String,
    pub payout_instructions: String,
}

/// Harvester plot listings keyed by `host:port` of the reporting peer.
#[derive(Debug, Clone, Deserialize)]
pub struct GetPlotsResponse {
    #[serde(flatten)]
    pub harvesters: BTreeMap<String, serde_json::Value>,
}

pub async fn get_signage_point(
    agent: &RpcAgent,
    params: &GetSignagePointRequest,
) -> RpcResult<GetSignagePointResponse> {
    agent.send("get_signage_point", params).await
}

pub async fn get_signage_points(agent: &RpcAgent) -> RpcResult<GetSignagePointsResponse> {
    agent.send_command("get_signage_points").await
}

pub async fn get_reward_targets(
    agent: &RpcAgent,
    params: &GetRewardTargetsRequest,
) -> RpcResult<GetRewardTargetsResponse> {
    agent.send("get_reward_targets", params).await
}

pub async fn set_reward_targets(
    agent: &RpcAgent,
    params: &SetRewardTargetsRequest,
) -> RpcResult<EmptyResponse> {
    agent.send("set_reward_targets", params).await
}

pub async fn get_pool_state(agent: &RpcAgent) -> RpcResult<GetPoolStateResponse> {
    agent.send_command("get_pool_state").await
}

pub async fn set_payout_instructions(
    agent: &RpcAgent,
    params: &SetPayoutInstructionsRequest,
) -> RpcResult<EmptyResponse> {
    agent.send("set_payout_instructions", params).await
}

pub async fn get_plots(agent: &RpcAgent) -> RpcResult<GetPlotsResponse> {
    agent.send_command("get_plots").await
}
