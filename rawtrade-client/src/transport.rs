use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use serde::Serialize;

use crate::error::CallFailure;

/// A log entry of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Confirmation that a submitted transaction was included in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxReceipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub gas_used: u64,
    /// `false` when the transaction was mined but reverted.
    pub success: bool,
    pub logs: Vec<TxLog>,
}

/// Signer-bound access to one deployed contract.
///
/// Implementations carry the endpoint, the contract address and the signing
/// identity. Calldata is already ABI-encoded; the transport only moves bytes
/// and reports failures with their original message.
#[async_trait]
pub trait ContractTransport: Send + Sync {
    /// Address of the signing identity.
    fn account(&self) -> Address;

    /// Chain the endpoint is connected to.
    async fn chain_id(&self) -> Result<u64, CallFailure>;

    /// Execute a read-only call and return the raw return data.
    async fn call(&self, calldata: Bytes) -> Result<Bytes, CallFailure>;

    /// Sign and submit a transaction; returns the pending transaction hash.
    async fn send_transaction(&self, calldata: Bytes) -> Result<B256, CallFailure>;

    /// Wait until the transaction is included and return its receipt.
    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TxReceipt, CallFailure>;
}
