//! In-memory stand-in for the deployed trading contract.
//!
//! [`MockContract`] decodes the same calldata the RPC transport would send,
//! applies the contract's access and state rules, and answers with
//! ABI-encoded return data, so the adapter under test runs its real encoding
//! and decoding paths.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::{address, keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolEvent, SolInterface};
use async_trait::async_trait;
use tokio::sync::{watch, Notify};

use crate::abi::IRawMaterialsTrading::{self as contract, IRawMaterialsTradingCalls as Calls};
use crate::error::CallFailure;
use crate::transport::{ContractTransport, TxLog, TxReceipt};
use rawtrade_types::constants::{CATEGORY_COUNT, DEFAULT_CONTRACT_ADDRESS, SEPOLIA_CHAIN_ID};

pub const OWNER: Address = address!("00000000000000000000000000000000000000a0");
pub const ALICE: Address = address!("00000000000000000000000000000000000000a1");
pub const BOB: Address = address!("00000000000000000000000000000000000000b0");

const GENESIS_TIME: u64 = 1_700_000_000;

struct MockMaterial {
    name: String,
    category: u8,
    supplier: Address,
    is_active: bool,
    created_at: u64,
    quality_grade: String,
    delivery_timeframe: U256,
}

struct MockOrder {
    buyer: Address,
    material_id: U256,
    status: u8,
    created_at: u64,
    matched_at: u64,
    matched_supplier: Address,
    delivery_location: String,
    special_requirements: B256,
}

struct MockMatch {
    material_id: U256,
    buyer: Address,
    supplier: Address,
    timestamp: u64,
    is_confirmed: bool,
}

struct MockState {
    owner: Address,
    chain_id: u64,
    clock: u64,
    next_material_id: u64,
    next_order_id: u64,
    materials: BTreeMap<u64, MockMaterial>,
    orders: BTreeMap<u64, MockOrder>,
    matches: HashMap<u64, MockMatch>,
    suppliers: HashSet<Address>,
    buyers: HashSet<Address>,
    fail_calls: bool,
    fail_sends: bool,
    fail_receipts: bool,
    receipts: HashMap<B256, TxReceipt>,
    sent: u64,
    gate: Option<ReceiptGate>,
}

/// Shared handle to one simulated contract deployment.
#[derive(Clone)]
pub struct MockContract {
    state: Arc<Mutex<MockState>>,
}

/// Holds back receipts until released, so tests can act while a write is
/// waiting for confirmation.
#[derive(Clone)]
pub struct ReceiptGate {
    submitted: Arc<Notify>,
    released: Arc<watch::Sender<bool>>,
}

impl ReceiptGate {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            submitted: Arc::new(Notify::new()),
            released: Arc::new(tx),
        }
    }

    /// Resolves once a transaction has been submitted behind the gate.
    pub async fn wait_until_submitted(&self) {
        self.submitted.notified().await;
    }

    /// Let every held and future receipt through.
    pub fn release(&self) {
        self.released.send_replace(true);
    }

    async fn pass(&self) {
        let mut rx = self.released.subscribe();
        let _ = rx.wait_for(|open| *open).await;
    }
}

impl MockContract {
    pub fn new(owner: Address) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                owner,
                chain_id: SEPOLIA_CHAIN_ID,
                clock: GENESIS_TIME,
                next_material_id: 1,
                next_order_id: 1,
                materials: BTreeMap::new(),
                orders: BTreeMap::new(),
                matches: HashMap::new(),
                suppliers: HashSet::new(),
                buyers: HashSet::new(),
                fail_calls: false,
                fail_sends: false,
                fail_receipts: false,
                receipts: HashMap::new(),
                sent: 0,
                gate: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// A transport signing as `account`.
    pub fn transport(&self, account: Address) -> Arc<dyn ContractTransport> {
        Arc::new(MockTransport {
            contract: self.clone(),
            account,
        })
    }

    /// Mark `account` as a verified supplier without a transaction.
    pub fn verify_supplier(&self, account: Address) {
        self.lock().suppliers.insert(account);
    }

    /// Mark `account` as a verified buyer without a transaction.
    pub fn verify_buyer(&self, account: Address) {
        self.lock().buyers.insert(account);
    }

    /// Make every read fail with a transport error.
    pub fn set_fail_calls(&self, fail: bool) {
        self.lock().fail_calls = fail;
    }

    /// Make every submission fail with a transport error.
    pub fn set_fail_sends(&self, fail: bool) {
        self.lock().fail_sends = fail;
    }

    /// Mine submitted transactions as failed, without applying them.
    pub fn set_fail_receipts(&self, fail: bool) {
        self.lock().fail_receipts = fail;
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.lock().chain_id = chain_id;
    }

    /// Hold receipts until the returned gate is released.
    pub fn hold_receipts(&self) -> ReceiptGate {
        let gate = ReceiptGate::new();
        self.lock().gate = Some(gate.clone());
        gate
    }

    /// Raw `bytes32` stored for an order's special requirements.
    pub fn special_requirements(&self, order_id: U256) -> Option<B256> {
        let key = u64::try_from(order_id).ok()?;
        self.lock().orders.get(&key).map(|o| o.special_requirements)
    }

    /// Number of transactions accepted for submission.
    pub fn sent_transactions(&self) -> u64 {
        self.lock().sent
    }
}

struct MockTransport {
    contract: MockContract,
    account: Address,
}

fn revert(reason: &str) -> CallFailure {
    CallFailure::Reverted(reason.to_string())
}

fn id_key(id: U256) -> Option<u64> {
    u64::try_from(id).ok()
}

fn id_topic(id: u64) -> B256 {
    B256::from(U256::from(id).to_be_bytes::<32>())
}

impl MockState {
    fn tick(&mut self) -> u64 {
        self.clock += 12;
        self.clock
    }

    fn view(&self, calldata: &[u8]) -> Result<Vec<u8>, CallFailure> {
        let call = Calls::abi_decode(calldata).map_err(|e| revert(&e.to_string()))?;
        let out = match call {
            Calls::owner(_) => contract::ownerCall::abi_encode_returns(&self.owner),
            Calls::nextMaterialId(_) => {
                contract::nextMaterialIdCall::abi_encode_returns(&U256::from(self.next_material_id))
            }
            Calls::nextOrderId(_) => {
                contract::nextOrderIdCall::abi_encode_returns(&U256::from(self.next_order_id))
            }
            Calls::verifiedSuppliers(c) => contract::verifiedSuppliersCall::abi_encode_returns(
                &self.suppliers.contains(&c.account),
            ),
            Calls::verifiedBuyers(c) => {
                contract::verifiedBuyersCall::abi_encode_returns(&self.buyers.contains(&c.account))
            }
            Calls::getMaterialInfo(c) => {
                let m = id_key(c.materialId).and_then(|k| self.materials.get(&k));
                let ret = match m {
                    Some(m) => contract::getMaterialInfoReturn {
                        name: m.name.clone(),
                        category: m.category,
                        supplier: m.supplier,
                        isActive: m.is_active,
                        createdAt: U256::from(m.created_at),
                        qualityGrade: m.quality_grade.clone(),
                        deliveryTimeframe: m.delivery_timeframe,
                    },
                    None => contract::getMaterialInfoReturn {
                        name: String::new(),
                        category: 0,
                        supplier: Address::ZERO,
                        isActive: false,
                        createdAt: U256::ZERO,
                        qualityGrade: String::new(),
                        deliveryTimeframe: U256::ZERO,
                    },
                };
                contract::getMaterialInfoCall::abi_encode_returns(&ret)
            }
            Calls::getMaterialsByCategory(c) => {
                if c.category >= CATEGORY_COUNT {
                    return Err(revert("Invalid category"));
                }
                let ids: Vec<U256> = self
                    .materials
                    .iter()
                    .filter(|(_, m)| m.category == c.category && m.is_active)
                    .map(|(id, _)| U256::from(*id))
                    .collect();
                contract::getMaterialsByCategoryCall::abi_encode_returns(&ids)
            }
            Calls::getSupplierMaterials(c) => {
                let ids: Vec<U256> = self
                    .materials
                    .iter()
                    .filter(|(_, m)| m.supplier == c.supplier)
                    .map(|(id, _)| U256::from(*id))
                    .collect();
                contract::getSupplierMaterialsCall::abi_encode_returns(&ids)
            }
            Calls::getOrderInfo(c) => {
                let o = id_key(c.orderId).and_then(|k| self.orders.get(&k));
                let ret = match o {
                    Some(o) => contract::getOrderInfoReturn {
                        buyer: o.buyer,
                        materialId: o.material_id,
                        status: o.status,
                        createdAt: U256::from(o.created_at),
                        matchedAt: U256::from(o.matched_at),
                        matchedSupplier: o.matched_supplier,
                        deliveryLocation: o.delivery_location.clone(),
                    },
                    None => contract::getOrderInfoReturn {
                        buyer: Address::ZERO,
                        materialId: U256::ZERO,
                        status: 0,
                        createdAt: U256::ZERO,
                        matchedAt: U256::ZERO,
                        matchedSupplier: Address::ZERO,
                        deliveryLocation: String::new(),
                    },
                };
                contract::getOrderInfoCall::abi_encode_returns(&ret)
            }
            Calls::getBuyerOrders(c) => {
                let ids: Vec<U256> = self
                    .orders
                    .iter()
                    .filter(|(_, o)| o.buyer == c.buyer)
                    .map(|(id, _)| U256::from(*id))
                    .collect();
                contract::getBuyerOrdersCall::abi_encode_returns(&ids)
            }
            Calls::getTradeMatch(c) => {
                let m = id_key(c.orderId).and_then(|k| self.matches.get(&k));
                let ret = match m {
                    Some(m) => contract::getTradeMatchReturn {
                        materialId: m.material_id,
                        buyer: m.buyer,
                        supplier: m.supplier,
                        timestamp: U256::from(m.timestamp),
                        isConfirmed: m.is_confirmed,
                    },
                    None => contract::getTradeMatchReturn {
                        materialId: U256::ZERO,
                        buyer: Address::ZERO,
                        supplier: Address::ZERO,
                        timestamp: U256::ZERO,
                        isConfirmed: false,
                    },
                };
                contract::getTradeMatchCall::abi_encode_returns(&ret)
            }
            _ => return Err(revert("not a view function")),
        };
        Ok(out)
    }

    /// Apply a state-changing call as `caller`, returning its event logs.
    /// Nothing is modified when a rule rejects the call.
    fn execute(&mut self, caller: Address, calldata: &[u8]) -> Result<Vec<TxLog>, CallFailure> {
        let call = Calls::abi_decode(calldata).map_err(|e| revert(&e.to_string()))?;
        let mut logs = Vec::new();
        let mut emit = |topics: Vec<B256>, data: Vec<u8>| {
            logs.push(TxLog {
                address: DEFAULT_CONTRACT_ADDRESS,
                topics,
                data: Bytes::from(data),
            })
        };

        match call {
            Calls::verifySupplier(c) => {
                self.only_owner(caller)?;
                self.suppliers.insert(c.supplier);
                emit(
                    vec![contract::SupplierVerified::SIGNATURE_HASH, c.supplier.into_word()],
                    Vec::new(),
                );
            }
            Calls::verifyBuyer(c) => {
                self.only_owner(caller)?;
                self.buyers.insert(c.buyer);
                emit(
                    vec![contract::BuyerVerified::SIGNATURE_HASH, c.buyer.into_word()],
                    Vec::new(),
                );
            }
            Calls::listMaterial(c) => {
                if !self.suppliers.contains(&caller) {
                    return Err(revert("Not a verified supplier"));
                }
                if c.category >= CATEGORY_COUNT {
                    return Err(revert("Invalid category"));
                }
                let id = self.next_material_id;
                self.next_material_id += 1;
                let created_at = self.tick();
                self.materials.insert(
                    id,
                    MockMaterial {
                        name: c.name,
                        category: c.category,
                        supplier: caller,
                        is_active: true,
                        created_at,
                        quality_grade: c.qualityGrade,
                        delivery_timeframe: c.deliveryTimeframe,
                    },
                );
                emit(
                    vec![
                        contract::MaterialListed::SIGNATURE_HASH,
                        id_topic(id),
                        caller.into_word(),
                    ],
                    U256::from(c.category).to_be_bytes::<32>().to_vec(),
                );
            }
            Calls::placeOrder(c) => {
                if !self.buyers.contains(&caller) {
                    return Err(revert("Not a verified buyer"));
                }
                let available = id_key(c.materialId)
                    .and_then(|k| self.materials.get(&k))
                    .is_some_and(|m| m.is_active);
                if !available {
                    return Err(revert("Material not available"));
                }
                let id = self.next_order_id;
                self.next_order_id += 1;
                let created_at = self.tick();
                self.orders.insert(
                    id,
                    MockOrder {
                        buyer: caller,
                        material_id: c.materialId,
                        status: 0,
                        created_at,
                        matched_at: 0,
                        matched_supplier: Address::ZERO,
                        delivery_location: c.deliveryLocation,
                        special_requirements: c.encryptedSpecialRequirements,
                    },
                );
                emit(
                    vec![
                        contract::OrderPlaced::SIGNATURE_HASH,
                        id_topic(id),
                        caller.into_word(),
                        B256::from(c.materialId.to_be_bytes::<32>()),
                    ],
                    Vec::new(),
                );
            }
            Calls::matchTrade(c) => {
                let key = id_key(c.orderId).ok_or_else(|| revert("Order not pending"))?;
                let order = self
                    .orders
                    .get(&key)
                    .filter(|o| o.status == 0)
                    .ok_or_else(|| revert("Order not pending"))?;
                let material_supplier = id_key(order.material_id)
                    .and_then(|k| self.materials.get(&k))
                    .map(|m| m.supplier);
                if material_supplier != Some(caller) {
                    return Err(revert("Not the material supplier"));
                }
                let (material_id, buyer) = (order.material_id, order.buyer);
                let now = self.tick();
                if let Some(order) = self.orders.get_mut(&key) {
                    order.status = 1;
                    order.matched_at = now;
                    order.matched_supplier = caller;
                }
                self.matches.insert(
                    key,
                    MockMatch {
                        material_id,
                        buyer,
                        supplier: caller,
                        timestamp: now,
                        is_confirmed: false,
                    },
                );
                emit(
                    vec![
                        contract::TradeMatched::SIGNATURE_HASH,
                        id_topic(key),
                        B256::from(material_id.to_be_bytes::<32>()),
                        buyer.into_word(),
                    ],
                    caller.into_word().to_vec(),
                );
            }
            Calls::confirmTrade(c) => {
                let key = id_key(c.orderId).ok_or_else(|| revert("Order not matched"))?;
                let order = self
                    .orders
                    .get_mut(&key)
                    .ok_or_else(|| revert("Order not matched"))?;
                if order.buyer != caller {
                    return Err(revert("Not the order buyer"));
                }
                if order.status != 1 {
                    return Err(revert("Order not matched"));
                }
                order.status = 2;
                let material_id = order.material_id;
                if let Some(m) = self.matches.get_mut(&key) {
                    m.is_confirmed = true;
                }
                emit(
                    vec![
                        contract::TradeCompleted::SIGNATURE_HASH,
                        id_topic(key),
                        B256::from(material_id.to_be_bytes::<32>()),
                    ],
                    Vec::new(),
                );
            }
            Calls::cancelOrder(c) => {
                let key = id_key(c.orderId).ok_or_else(|| revert("Order not pending"))?;
                let order = self
                    .orders
                    .get_mut(&key)
                    .ok_or_else(|| revert("Order not pending"))?;
                if order.buyer != caller {
                    return Err(revert("Not the order buyer"));
                }
                if order.status != 0 {
                    return Err(revert("Order not pending"));
                }
                order.status = 3;
            }
            Calls::deactivateMaterial(c) => {
                let material = id_key(c.materialId)
                    .and_then(|k| self.materials.get_mut(&k))
                    .ok_or_else(|| revert("Material not found"))?;
                if material.supplier != caller {
                    return Err(revert("Not the material supplier"));
                }
                material.is_active = false;
            }
            _ => return Err(revert("view function sent as transaction")),
        }
        Ok(logs)
    }

    fn only_owner(&self, caller: Address) -> Result<(), CallFailure> {
        if caller != self.owner {
            return Err(revert("Only owner"));
        }
        Ok(())
    }
}

#[async_trait]
impl ContractTransport for MockTransport {
    fn account(&self) -> Address {
        self.account
    }

    async fn chain_id(&self) -> Result<u64, CallFailure> {
        let state = self.contract.lock();
        if state.fail_calls {
            return Err(CallFailure::Transport("connection refused".to_string()));
        }
        Ok(state.chain_id)
    }

    async fn call(&self, calldata: Bytes) -> Result<Bytes, CallFailure> {
        let state = self.contract.lock();
        if state.fail_calls {
            return Err(CallFailure::Transport("connection refused".to_string()));
        }
        state.view(&calldata).map(Bytes::from)
    }

    async fn send_transaction(&self, calldata: Bytes) -> Result<B256, CallFailure> {
        let (gate, tx_hash) = {
            let mut state = self.contract.lock();
            if state.fail_sends {
                return Err(CallFailure::Transport("connection refused".to_string()));
            }
            let logs = if state.fail_receipts {
                Vec::new()
            } else {
                state.execute(self.account, &calldata)?
            };
            state.sent += 1;
            let tx_hash = keccak256(state.sent.to_be_bytes());
            let receipt = TxReceipt {
                transaction_hash: tx_hash,
                block_number: state.sent,
                gas_used: 50_000,
                success: !state.fail_receipts,
                logs,
            };
            state.receipts.insert(tx_hash, receipt);
            (state.gate.clone(), tx_hash)
        };
        if let Some(gate) = gate {
            gate.submitted.notify_one();
        }
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TxReceipt, CallFailure> {
        let gate = self.contract.lock().gate.clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        self.contract
            .lock()
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| CallFailure::Transport(format!("unknown transaction {tx_hash}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejected_transaction_leaves_state_untouched() {
        let mock = MockContract::new(OWNER);
        let transport = mock.transport(ALICE);
        let call = contract::verifyBuyerCall { buyer: BOB };
        let err = transport
            .send_transaction(Bytes::from(call.abi_encode()))
            .await
            .unwrap_err();
        assert_eq!(err, CallFailure::Reverted("Only owner".to_string()));
        assert_eq!(mock.sent_transactions(), 0);
    }

    #[tokio::test]
    async fn test_unknown_material_reads_as_zeroed_record() {
        let mock = MockContract::new(OWNER);
        let transport = mock.transport(ALICE);
        let call = contract::getMaterialInfoCall {
            materialId: U256::from(5u64),
        };
        let out = transport.call(Bytes::from(call.abi_encode())).await.unwrap();
        let ret = contract::getMaterialInfoCall::abi_decode_returns(&out).unwrap();
        assert_eq!(ret.supplier, Address::ZERO);
        assert!(!ret.isActive);
    }

    #[tokio::test]
    async fn test_chain_id_is_configurable() {
        let mock = MockContract::new(OWNER);
        let transport = mock.transport(ALICE);
        assert_eq!(transport.chain_id().await.unwrap(), SEPOLIA_CHAIN_ID);
        mock.set_chain_id(1);
        assert_eq!(transport.chain_id().await.unwrap(), 1);
    }
}
