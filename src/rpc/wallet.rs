//! Wallet service commands (`cactus_wallet`).
//!
//! Grouped the way the node groups them: key management, wallet node state,
//! and per-wallet operations. Spend bundles stay opaque hex/JSON — building
//! or validating them is the node's business.

use serde::{Deserialize, Serialize};

use crate::rpc::agent::{EmptyResponse, RpcAgent};
use crate::rpc::RpcResult;

// # Key management

#[derive(Debug, Clone, Serialize)]
pub struct LogInRequest {
    pub fingerprint: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogInResponse {
    pub fingerprint: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetLoggedInFingerprintResponse {
    pub fingerprint: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetPublicKeysResponse {
    pub public_key_fingerprints: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetPrivateKeyRequest {
    pub fingerprint: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrivateKeyInfo {
    pub fingerprint: i64,
    pub sk: String,
    pub pk: String,
    pub farmer_pk: String,
    pub pool_pk: String,
    pub seed: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetPrivateKeyResponse {
    pub private_key: PrivateKeyInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateMnemonicResponse {
    pub mnemonic: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddKeyRequest {
    pub mnemonic: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddKeyResponse {
    pub fingerprint: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteKeyRequest {
    pub fingerprint: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckDeleteKeyRequest {
    pub fingerprint: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckDeleteKeyResponse {
    pub fingerprint: i64,
    pub used_for_farmer_rewards: bool,
    pub used_for_pool_rewards: bool,
    pub wallet_balance: bool,
}

// # Wallet node state

#[derive(Debug, Clone, Deserialize)]
pub struct GetSyncStatusResponse {
    pub synced: bool,
    pub syncing: bool,
    pub genesis_initialized: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetHeightInfoResponse {
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetNetworkInfoResponse {
    pub network_name: String,
    pub network_prefix: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushTxRequest {
    /// Serialized spend bundle as a hex string.
    pub spend_bundle: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FarmBlockRequest {
    pub address: String,
}

// # Wallets and transactions

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletInfo {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub wallet_type: u8,
    pub data: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetWalletsRequest {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub wallet_type: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetWalletsResponse {
    pub wallets: Vec<WalletInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetWalletBalanceRequest {
    pub wallet_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletBalance {
    pub wallet_id: u32,
    pub confirmed_wallet_balance: u64,
    pub unconfirmed_wallet_balance: u64,
    pub spendable_balance: u64,
    pub pending_change: u64,
    pub max_send_amount: u64,
    pub unspent_coin_count: i64,
    pub pending_coin_removal_count: i64,
    pub fingerprint: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetWalletBalanceResponse {
    pub wallet_balance: WalletBalance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub parent_coin_info: String,
    pub puzzle_hash: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub name: String,
    pub wallet_id: u32,
    pub confirmed_at_height: u32,
    pub created_at_time: u64,
    pub amount: u64,
    pub fee_amount: u64,
    pub confirmed: bool,
    pub sent: u32,
    pub to_address: Option<String>,
    pub to_puzzle_hash: Option<String>,
    #[serde(rename = "type")]
    pub tx_type: Option<u8>,
    pub additions: Vec<Coin>,
    pub removals: Vec<Coin>,
    /// Opaque to this client; pushed back verbatim via `push_tx`.
    pub spend_bundle: Option<serde_json::Value>,
    pub memos: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetTransactionRequest {
    pub transaction_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetTransactionResponse {
    pub transaction: TransactionRecord,
    pub transaction_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetTransactionsRequest {
    pub wallet_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetTransactionsResponse {
    pub transactions: Vec<TransactionRecord>,
    pub wallet_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetTransactionCountRequest {
    pub wallet_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetTransactionCountResponse {
    pub count: i64,
    pub wallet_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetNextAddressRequest {
    /// `false` re-reads the current address without advancing the derivation
    /// index.
    pub new_address: bool,
    pub wallet_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetNextAddressResponse {
    pub wallet_id: u32,
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendTransactionRequest {
    pub wallet_id: i64,
    pub amount: u64,
    pub fee: u64,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memos: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendTransactionResponse {
    pub transaction: TransactionRecord,
    pub transaction_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetFarmedAmountResponse {
    pub farmed_amount: u64,
    pub pool_reward_amount: u64,
    pub farmer_reward_amount: u64,
    pub fee_amount: u64,
    pub last_height_farmed: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Addition {
    pub amount: u64,
    pub puzzle_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memos: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoinAnnouncement {
    pub coin_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morph_bytes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PuzzleAnnouncement {
    pub puzzle_hash: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morph_bytes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSignedTransactionRequest {
    pub additions: Vec<Addition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coins: Option<Vec<Coin>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin_announcements: Option<Vec<CoinAnnouncement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub puzzle_announcements: Option<Vec<PuzzleAnnouncement>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSignedTransactionResponse {
    pub signed_tx: TransactionRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteUnconfirmedTransactionsRequest {
    pub wallet_id: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectCoinsRequest {
    pub amount: u64,
    pub wallet_id: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectCoinsResponse {
    pub coins: Vec<Coin>,
}

pub async fn log_in(agent: &RpcAgent, params: &LogInRequest) -> RpcResult<LogInResponse> {
    agent.send("log_in", params).await
}

pub async fn get_logged_in_fingerprint(
    agent: &RpcAgent,
) -> RpcResult<GetLoggedInFingerprintResponse> {
    agent.send_command("get_logged_in_fingerprint").await
}

pub async fn get_public_keys(agent: &RpcAgent) -> RpcResult<GetPublicKeysResponse> {
    agent.send_command("get_public_keys").await
}

pub async fn get_private_key(
    agent: &RpcAgent,
    params: &GetPrivateKeyRequest,
) -> RpcResult<GetPrivateKeyResponse> {
    agent.send("get_private_key", params).await
}

pub async fn generate_mnemonic(agent: &RpcAgent) -> RpcResult<GenerateMnemonicResponse> {
    agent.send_command("generate_mnemonic").await
}

pub async fn add_key(agent: &RpcAgent, params: &AddKeyRequest) -> RpcResult<AddKeyResponse> {
    agent.send("add_key", params).await
}

pub async fn delete_key(agent: &RpcAgent, params: &DeleteKeyRequest) -> RpcResult<EmptyResponse> {
    agent.send("delete_key", params).await
}

pub async fn check_delete_key(
    agent: &RpcAgent,
    params: &CheckDeleteKeyRequest,
) -> RpcResult<CheckDeleteKeyResponse> {
    agent.send("check_delete_key", params).await
}

pub async fn delete_all_keys(agent: &RpcAgent) -> RpcResult<EmptyResponse> {
    agent.send_command("delete_all_keys").await
}

pub async fn get_sync_status(agent: &RpcAgent) -> RpcResult<GetSyncStatusResponse> {
    agent.send_command("get_sync_status").await
}

pub async fn get_height_info(agent: &RpcAgent) -> RpcResult<GetHeightInfoResponse> {
    agent.send_command("get_height_info").await
}

pub async fn get_network_info(agent: &RpcAgent) -> RpcResult<GetNetworkInfoResponse> {
    agent.send_command("get_network_info").await
}

pub async fn push_tx(agent: &RpcAgent, params: &PushTxRequest) -> RpcResult<EmptyResponse> {
    agent.send("push_tx", params).await
}

pub async fn farm_block(agent: &RpcAgent, params: &FarmBlockRequest) -> RpcResult<EmptyResponse> {
    agent.send("farm_block", params).await
}

pub async fn get_wallets(
    agent: &RpcAgent,
    params: &GetWalletsRequest,
) -> RpcResult<GetWalletsResponse> {
    agent.send("get_wallets", params).await
}

pub async fn get_wallet_balance(
    agent: &RpcAgent,
    params: &GetWalletBalanceRequest,
) -> RpcResult<GetWalletBalanceResponse> {
    agent.send("get_wallet_balance", params).await
}

pub async fn get_transaction(
    agent: &RpcAgent,
    params: &GetTransactionRequest,
) -> RpcResult<GetTransactionResponse> {
    agent.send("get_transaction", params).await
}

pub async fn get_transactions(
    agent: &RpcAgent,
    params: &GetTransactionsRequest,
) -> RpcResult<GetTransactionsResponse> {
    agent.send("get_transactions", params).await
}

pub async fn get_transaction_count(
    agent: &RpcAgent,
    params: &GetTransactionCountRequest,
) -> RpcResult<GetTransactionCountResponse> {
    agent.send("get_transaction_count", params).await
}

pub async fn get_next_address(
    agent: &RpcAgent,
    params: &GetNextAddressRequest,
) -> RpcResult<GetNextAddressResponse> {
    agent.send("get_next_address", params).await
}

pub async fn send_transaction(
    agent: &RpcAgent,
    params: &SendTransactionRequest,
) -> RpcResult<SendTransactionResponse> {
    agent.send("send_transaction", params).await
}

pub async fn get_farmed_amount(agent: &RpcAgent) -> RpcResult<GetFarmedAmountResponse> {
    agent.send_command("get_farmed_amount").await
}

pub async fn create_signed_transaction(
    agent: &RpcAgent,
    params: &CreateSignedTransactionRequest,
) -> RpcResult<CreateSignedTransactionResponse> {
    agent.send("create_signed_transaction", params).await
}

pub async fn delete_unconfirmed_transactions(
    agent: &RpcAgent,
    params: &DeleteUnconfirmedTransactionsRequest,
) -> RpcResult<EmptyResponse> {
    agent.send("delete_unconfirmed_transactions", params).await
}

pub async fn select_coins(
    agent: &RpcAgent,
    params: &SelectCoinsRequest,
) -> RpcResult<SelectCoinsResponse> {
    agent.send("select_coins", params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_transaction() -> serde_json::Value {
        json!({
            "name": "0xtx",
            "wallet_id": 1,
            "confirmed_at_height": 1000,
            "created_at_time": 1_650_000_000u64,
            "amount": 1_000_000_000_000u64,
            "fee_amount": 0,
            "confirmed": true,
            "sent": 1,
            "to_address": "cac1destination",
            "to_puzzle_hash": "0x99",
            "type": 1,
            "additions": [
                {"parent_coin_info": "0x01", "puzzle_hash": "0x02", "amount": 1_000_000_000_000u64}
            ],
            "removals": [],
            "spend_bundle": null,
            "memos": null,
        })
    }

    #[test]
    fn transaction_record_decodes_node_response() {
        let tx: TransactionRecord = serde_json::from_value(sample_transaction()).unwrap();
        assert_eq!(tx.wallet_id, 1);
        assert_eq!(tx.additions.len(), 1);
        assert!(tx.spend_bundle.is_none());
    }

    #[test]
    fn wallet_balance_decodes_with_optional_fingerprint() {
        let value = json!({
            "wallet_balance": {
                "wallet_id": 1,
                "confirmed_wallet_balance": 1_000_000u64,
                "unconfirmed_wallet_balance": 1_000_000u64,
                "spendable_balance": 900_000u64,
                "pending_change": 0,
                "max_send_amount": 900_000u64,
                "unspent_coin_count": 3,
                "pending_coin_removal_count": 0,
            }
        });

        let response: GetWalletBalanceResponse = serde_json::from_value(value).unwrap();
        assert_eq!(response.wallet_balance.spendable_balance, 900_000);
        assert!(response.wallet_balance.fingerprint.is_none());
    }

    #[test]
    fn transactions_request_omits_unset_paging_fields() {
        let request = GetTransactionsRequest {
            wallet_id: 1,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({"wallet_id": 1})
        );
    }

    #[test]
    fn wallet_type_filter_uses_node_field_name() {
        let request = GetWalletsRequest {
            wallet_type: Some(6),
        };
        assert_eq!(serde_json::to_value(request).unwrap(), json!({"type": 6}));
    }
}
