use std::time::Duration;

use alloy_consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::{Address, Bytes, TxKind, B256, U128, U256, U64};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde::Deserialize;
use tracing::debug;

use crate::error::{CallFailure, ClientError};
use crate::transport::{ContractTransport, TxLog, TxReceipt};

/// Default RPC request timeout in seconds.
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Default interval between receipt polls in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// Headroom added on top of `eth_estimateGas`, in percent.
const GAS_LIMIT_MARGIN_PERCENT: u64 = 120;

/// Priority fee used when the node does not implement `eth_maxPriorityFeePerGas` (1 gwei).
const FALLBACK_PRIORITY_FEE: u128 = 1_000_000_000;

/// JSON-RPC error code for execution reverts.
const EXECUTION_REVERTED_CODE: i32 = 3;

/// Where and how to reach the contract.
#[derive(Debug, Clone)]
pub struct RpcSettings {
    pub url: String,
    pub contract: Address,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
}

impl RpcSettings {
    pub fn new(url: impl Into<String>, contract: Address) -> Self {
        Self {
            url: url.into(),
            contract,
            request_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: B256,
    block_number: Option<U64>,
    gas_used: U64,
    status: Option<U64>,
    #[serde(default)]
    logs: Vec<RpcLog>,
}

#[derive(Deserialize)]
struct RpcLog {
    address: Address,
    topics: Vec<B256>,
    data: Bytes,
}

impl From<RpcReceipt> for TxReceipt {
    fn from(r: RpcReceipt) -> Self {
        TxReceipt {
            transaction_hash: r.transaction_hash,
            block_number: r.block_number.map(|n| n.to::<u64>()).unwrap_or_default(),
            gas_used: r.gas_used.to::<u64>(),
            // Pre-Byzantium receipts carry no status; treat them as successful.
            success: r.status.map(|s| s != U64::ZERO).unwrap_or(true),
            logs: r
                .logs
                .into_iter()
                .map(|l| TxLog {
                    address: l.address,
                    topics: l.topics,
                    data: l.data,
                })
                .collect(),
        }
    }
}

/// Ethereum JSON-RPC transport that signs transactions locally.
pub struct RpcTransport {
    client: HttpClient,
    signer: PrivateKeySigner,
    contract: Address,
    poll_interval: Duration,
}

impl RpcTransport {
    /// Create a transport for `settings.contract` signed by `signer`.
    pub fn new(settings: &RpcSettings, signer: PrivateKeySigner) -> Result<Self, ClientError> {
        let client = HttpClientBuilder::default()
            .request_timeout(settings.request_timeout)
            .build(&settings.url)
            .map_err(|e| ClientError::Connect(format!("{}: {}", settings.url, e)))?;
        Ok(Self {
            client,
            signer,
            contract: settings.contract,
            poll_interval: settings.poll_interval,
        })
    }

    fn call_object(&self, calldata: &Bytes) -> serde_json::Value {
        serde_json::json!({
            "from": self.signer.address(),
            "to": self.contract,
            "data": calldata,
        })
    }

    /// Split JSON-RPC failures into reverts and transport problems, with a
    /// friendlier message when the endpoint cannot be reached at all.
    fn map_rpc_error(e: &jsonrpsee::core::ClientError) -> CallFailure {
        if let jsonrpsee::core::ClientError::Call(obj) = e {
            let message = obj.message().to_string();
            if obj.code() == EXECUTION_REVERTED_CODE || message.to_lowercase().contains("revert") {
                let reason = obj
                    .data()
                    .and_then(|raw| serde_json::from_str::<Bytes>(raw.get()).ok())
                    .and_then(|data| alloy_sol_types::decode_revert_reason(&data))
                    .unwrap_or(message);
                return CallFailure::Reverted(reason);
            }
            return CallFailure::Transport(message);
        }

        let msg = e.to_string();
        if msg.contains("connection")
            || msg.contains("Connection")
            || msg.contains("refused")
            || msg.contains("SendRequest")
            || msg.contains("send request")
        {
            CallFailure::Transport(format!(
                "could not reach the RPC endpoint ({msg})\nHint: check `network.rpc_url` with `rawtrade config`"
            ))
        } else {
            CallFailure::Transport(msg)
        }
    }

    /// `(max_fee_per_gas, max_priority_fee_per_gas)` for a new transaction.
    async fn fees(&self) -> Result<(u128, u128), CallFailure> {
        let gas_price: U128 = self
            .client
            .request("eth_gasPrice", rpc_params![])
            .await
            .map_err(|e| Self::map_rpc_error(&e))?;
        let tip = match self
            .client
            .request::<U128, _>("eth_maxPriorityFeePerGas", rpc_params![])
            .await
        {
            Ok(tip) => tip.to::<u128>(),
            Err(e) => {
                debug!(error = %e, "eth_maxPriorityFeePerGas unavailable, using fallback tip");
                FALLBACK_PRIORITY_FEE
            }
        };
        let max_fee = gas_price.to::<u128>().saturating_mul(2).saturating_add(tip);
        Ok((max_fee, tip))
    }
}

#[async_trait]
impl ContractTransport for RpcTransport {
    fn account(&self) -> Address {
        self.signer.address()
    }

    async fn chain_id(&self) -> Result<u64, CallFailure> {
        let id: U64 = self
            .client
            .request("eth_chainId", rpc_params![])
            .await
            .map_err(|e| Self::map_rpc_error(&e))?;
        Ok(id.to::<u64>())
    }

    async fn call(&self, calldata: Bytes) -> Result<Bytes, CallFailure> {
        self.client
            .request("eth_call", rpc_params![self.call_object(&calldata), "latest"])
            .await
            .map_err(|e| Self::map_rpc_error(&e))
    }

    async fn send_transaction(&self, calldata: Bytes) -> Result<B256, CallFailure> {
        let from = self.signer.address();

        // Reverts usually surface here, before anything is signed.
        let gas: U64 = self
            .client
            .request("eth_estimateGas", rpc_params![self.call_object(&calldata)])
            .await
            .map_err(|e| Self::map_rpc_error(&e))?;
        let nonce: U64 = self
            .client
            .request("eth_getTransactionCount", rpc_params![from, "pending"])
            .await
            .map_err(|e| Self::map_rpc_error(&e))?;
        let chain_id = self.chain_id().await?;
        let (max_fee_per_gas, max_priority_fee_per_gas) = self.fees().await?;

        let tx = TxEip1559 {
            chain_id,
            nonce: nonce.to::<u64>(),
            gas_limit: gas.to::<u64>().saturating_mul(GAS_LIMIT_MARGIN_PERCENT) / 100,
            max_fee_per_gas,
            max_priority_fee_per_gas,
            to: TxKind::Call(self.contract),
            value: U256::ZERO,
            access_list: Default::default(),
            input: calldata,
        };
        let signature = self
            .signer
            .sign_hash_sync(&tx.signature_hash())
            .map_err(|e| CallFailure::Signer(e.to_string()))?;
        let raw = TxEnvelope::from(tx.into_signed(signature)).encoded_2718();

        debug!(%from, nonce = nonce.to::<u64>(), "sending raw transaction");
        self.client
            .request("eth_sendRawTransaction", rpc_params![Bytes::from(raw)])
            .await
            .map_err(|e| Self::map_rpc_error(&e))
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TxReceipt, CallFailure> {
        loop {
            let receipt: Option<RpcReceipt> = self
                .client
                .request("eth_getTransactionReceipt", rpc_params![tx_hash])
                .await
                .map_err(|e| Self::map_rpc_error(&e))?;
            match receipt {
                Some(r) if r.block_number.is_some() => return Ok(r.into()),
                _ => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpsee::types::ErrorObjectOwned;

    #[test]
    fn test_revert_with_error_string_is_decoded() {
        // Error(string) payload for "Not a verified supplier".
        let data = alloy_sol_types::Revert {
            reason: "Not a verified supplier".to_string(),
        };
        let encoded = Bytes::from(alloy_sol_types::SolError::abi_encode(&data));
        let obj = ErrorObjectOwned::owned(3, "execution reverted", Some(encoded));
        let failure = RpcTransport::map_rpc_error(&jsonrpsee::core::ClientError::Call(obj));
        assert_eq!(
            failure,
            CallFailure::Reverted("Not a verified supplier".to_string())
        );
    }

    #[test]
    fn test_revert_without_data_keeps_message() {
        let obj = ErrorObjectOwned::owned::<()>(-32000, "execution reverted", None);
        let failure = RpcTransport::map_rpc_error(&jsonrpsee::core::ClientError::Call(obj));
        assert_eq!(failure, CallFailure::Reverted("execution reverted".to_string()));
    }

    #[test]
    fn test_other_call_errors_are_transport() {
        let obj = ErrorObjectOwned::owned::<()>(-32005, "rate limited", None);
        let failure = RpcTransport::map_rpc_error(&jsonrpsee::core::ClientError::Call(obj));
        assert_eq!(failure, CallFailure::Transport("rate limited".to_string()));
    }

    #[test]
    fn test_receipt_conversion() {
        let json = serde_json::json!({
            "transactionHash": format!("0x{}", "ab".repeat(32)),
            "blockNumber": "0x10",
            "gasUsed": "0x5208",
            "status": "0x0",
            "logs": []
        });
        let receipt: TxReceipt = serde_json::from_value::<RpcReceipt>(json).unwrap().into();
        assert_eq!(receipt.block_number, 16);
        assert_eq!(receipt.gas_used, 21_000);
        assert!(!receipt.success);
    }

    #[tokio::test]
    async fn test_transport_reports_signer_address() {
        let signer = PrivateKeySigner::random();
        let expected = signer.address();
        let settings = RpcSettings::new("http://127.0.0.1:8545", Address::ZERO);
        let transport = RpcTransport::new(&settings, signer).unwrap();
        assert_eq!(transport.account(), expected);
    }
}
