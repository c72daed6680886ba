//! Harvester service commands (`cactus_harvester`).

use serde::{Deserialize, Serialize};

use crate::rpc::agent::{EmptyResponse, RpcAgent};
use crate::rpc::RpcResult;

/// A plot file tracked by the harvester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plot {
    pub filename: String,
    /// Plot k-size.
    pub size: u8,
    #[serde(rename = "plot-seed", alias = "plot_id")]
    pub plot_seed: String,
    pub pool_public_key: Option<String>,
    pub pool_contract_puzzle_hash: Option<String>,
    pub plot_public_key: String,
    pub file_size: u64,
    pub time_modified: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetPlotsResponse {
    pub plots: Vec<Plot>,
    pub failed_to_open_filenames: Vec<String>,
    pub not_found_filenames: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletePlotRequest {
    pub filename: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddPlotDirectoryRequest {
    pub dirname: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemovePlotDirectoryRequest {
    pub dirname: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetPlotDirectoriesResponse {
    pub directories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetHarvesterConfigResponse {
    pub use_gpu_harvesting: bool,
    pub gpu_index: i64,
    pub enforce_gpu_index: bool,
    pub disable_cpu_affinity: bool,
    pub parallel_decompressor_count: i64,
    pub decompressor_thread_count: i64,
    pub recursive_plot_scan: bool,
    pub refresh_parameter_interval_seconds: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateHarvesterConfigRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_gpu_harvesting: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce_gpu_index: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_cpu_affinity: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_decompressor_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decompressor_thread_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive_plot_scan: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_parameter_interval_seconds: Option<u32>,
}

pub async fn get_plots(agent: &RpcAgent) -> RpcResult<GetPlotsResponse> {
    agent.send_command("get_plots").await
}

pub async fn refresh_plots(agent: &RpcAgent) -> RpcResult<EmptyResponse> {
    agent.send_command("refresh_plots").await
}

pub async fn delete_plot(agent: &RpcAgent, params: &DeletePlotRequest) -> RpcResult<EmptyResponse> {
    agent.send("delete_plot", params).await
}

pub async fn add_plot_directory(
    agent: &RpcAgent,
    params: &AddPlotDirectoryRequest,
) -> RpcResult<EmptyResponse> {
    agent.send("add_plot_directory", params).await
}

pub async fn get_plot_directories(agent: &RpcAgent) -> RpcResult<GetPlotDirectoriesResponse> {
    agent.send_command("get_plot_directories").await
}

pub async fn remove_plot_directory(
    agent: &RpcAgent,
    params: &RemovePlotDirectoryRequest,
) -> RpcResult<EmptyResponse> {
    agent.send("remove_plot_directory", params).await
}

pub async fn get_harvester_config(agent: &RpcAgent) -> RpcResult<GetHarvesterConfigResponse> {
    agent.send_command("get_harvester_config").await
}

pub async fn update_harvester_config(
    agent: &RpcAgent,
    params: &UpdateHarvesterConfigRequest,
) -> RpcResult<EmptyResponse> {
    agent.send("update_harvester_config", params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plot_listing_decodes_node_response() {
        let value = json!({
            "plots": [{
                "filename": "/plots/plot-k32.plot",
                "size": 32,
                "plot-seed": "0xdeadbeef",
                "pool_public_key": null,
                "pool_contract_puzzle_hash": "0x77",
                "plot_public_key": "0x88",
                "file_size": 108_000_000_000u64,
                "time_modified": 1_650_000_000.0,
            }],
            "failed_to_open_filenames": [],
            "not_found_filenames": ["/plots/gone.plot"],
        });

        let response: GetPlotsResponse = serde_json::from_value(value).unwrap();
        assert_eq!(response.plots.len(), 1);
        assert_eq!(response.plots[0].size, 32);
        assert!(response.plots[0].pool_public_key.is_none());
        assert_eq!(response.not_found_filenames.len(), 1);
    }

    #[test]
    fn partial_config_update_serializes_only_set_fields() {
        let request = UpdateHarvesterConfigRequest {
            recursive_plot_scan: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({"recursive_plot_scan": true})
        );
    }
}
