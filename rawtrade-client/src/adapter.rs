use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use rawtrade_types::primitives::to_u64;
use rawtrade_types::requirements::encode_requirements;
use rawtrade_types::{
    Material, MaterialCategory, MaterialId, MaterialListing, Order, OrderId, OrderRequest,
    OrderStatus, TradeMatch,
};
use tracing::{debug, error, info, warn};

use crate::abi::IRawMaterialsTrading as contract;
use crate::error::{CallFailure, ClientError, RemoteCallError};
use crate::guard::InFlight;
use crate::transport::{ContractTransport, TxReceipt};
use crate::verification::Verification;

/// The bound signer + endpoint. Replaced wholesale on every `init`.
struct Connection {
    transport: Arc<dyn ContractTransport>,
    account: Address,
    generation: u64,
}

/// Typed proxy for the trading contract.
///
/// Holds at most one connection. Every operation captures the connection that
/// is current when it starts; if the adapter is re-bound or reset before the
/// operation finishes, the result is dropped and
/// [`ClientError::ConnectionReplaced`] is returned instead.
///
/// Nothing read from the contract is cached: each call goes to the network.
pub struct ContractAdapter {
    current: RwLock<Option<Arc<Connection>>>,
    generation: AtomicU64,
    in_flight: InFlight,
}

impl Default for ContractAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractAdapter {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
            generation: AtomicU64::new(0),
            in_flight: InFlight::new(),
        }
    }

    /// Bind a signer-bound transport, discarding any previous connection.
    /// Returns the generation number of the new connection.
    pub fn init(&self, transport: Arc<dyn ContractTransport>) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let account = transport.account();
        let conn = Arc::new(Connection {
            transport,
            account,
            generation,
        });
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(conn);
        info!(%account, generation, "contract adapter bound");
        generation
    }

    /// Drop the current connection.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let previous = self
            .current
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(conn) = previous {
            info!(account = %conn.account, "contract adapter reset");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Address of the connected signing identity.
    pub fn account(&self) -> Option<Address> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|c| c.account)
    }

    /// Generation of the current connection, `None` when disconnected.
    pub fn generation(&self) -> Option<u64> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|c| c.generation)
    }

    /// Logical write actions currently waiting for confirmation.
    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    fn connection(&self) -> Result<Arc<Connection>, ClientError> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(ClientError::NotConnected)
    }

    fn ensure_current(&self, conn: &Connection, operation: &'static str) -> Result<(), ClientError> {
        if self.generation.load(Ordering::SeqCst) != conn.generation {
            warn!(operation, generation = conn.generation, "discarding result of replaced connection");
            return Err(ClientError::ConnectionReplaced { operation });
        }
        Ok(())
    }

    fn remote(operation: &'static str, cause: CallFailure) -> ClientError {
        error!(operation, %cause, "contract call failed");
        RemoteCallError::new(operation, cause).into()
    }

    async fn read<C: SolCall>(&self, operation: &'static str, call: C) -> Result<C::Return, ClientError> {
        let conn = self.connection()?;
        debug!(operation, "eth_call");
        let output = conn.transport.call(Bytes::from(call.abi_encode())).await;
        // Failures of a replaced connection are not reported as remote errors.
        self.ensure_current(&conn, operation)?;
        let output = output.map_err(|cause| Self::remote(operation, cause))?;
        C::abi_decode_returns(&output)
            .map_err(|e| Self::remote(operation, CallFailure::Decode(e.to_string())))
    }

    async fn write<C: SolCall>(
        &self,
        operation: &'static str,
        key: String,
        call: C,
    ) -> Result<TxReceipt, ClientError> {
        let conn = self.connection()?;
        let _guard = self.in_flight.acquire(key)?;

        let sent = conn
            .transport
            .send_transaction(Bytes::from(call.abi_encode()))
            .await;
        self.ensure_current(&conn, operation)?;
        let tx_hash = sent.map_err(|cause| Self::remote(operation, cause))?;
        info!(operation, %tx_hash, "transaction submitted, waiting for confirmation");

        let receipt = conn.transport.wait_for_receipt(tx_hash).await;
        self.ensure_current(&conn, operation)?;
        let receipt = receipt.map_err(|cause| Self::remote(operation, cause))?;

        if !receipt.success {
            return Err(Self::remote(
                operation,
                CallFailure::Reverted(format!(
                    "transaction {tx_hash} failed in block {}",
                    receipt.block_number
                )),
            ));
        }
        info!(operation, %tx_hash, block = receipt.block_number, "transaction confirmed");
        Ok(receipt)
    }

    /// `account`, or the connected identity when `None`.
    fn resolve_account(&self, account: Option<Address>) -> Result<Address, ClientError> {
        match account {
            Some(a) => Ok(a),
            None => self.account().ok_or(ClientError::NotConnected),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    /// Fetch one material. An id the contract does not know comes back as an
    /// all-zero record and is reported as `NotFound`.
    pub async fn get_material_info(&self, id: MaterialId) -> Result<Material, ClientError> {
        const OP: &str = "getMaterialInfo";
        let info = self
            .read(OP, contract::getMaterialInfoCall { materialId: id })
            .await?;
        if info.supplier == Address::ZERO {
            return Err(Self::remote(OP, CallFailure::NotFound(format!("material {id}"))));
        }
        let category = MaterialCategory::try_from(info.category)
            .map_err(|e| Self::remote(OP, CallFailure::Decode(e.to_string())))?;
        Ok(Material {
            id,
            name: info.name,
            category,
            supplier: info.supplier,
            is_active: info.isActive,
            created_at: to_u64(info.createdAt),
            quality_grade: info.qualityGrade,
            delivery_timeframe_days: to_u64(info.deliveryTimeframe),
        })
    }

    /// Active material ids in one category. Callers wanting every listing
    /// query each category themselves (see `catalog::active_materials`).
    pub async fn get_materials_by_category(
        &self,
        category: MaterialCategory,
    ) -> Result<Vec<MaterialId>, ClientError> {
        self.read(
            "getMaterialsByCategory",
            contract::getMaterialsByCategoryCall {
                category: category.as_u8(),
            },
        )
        .await
    }

    pub async fn get_order_info(&self, id: OrderId) -> Result<Order, ClientError> {
        const OP: &str = "getOrderInfo";
        let info = self
            .read(OP, contract::getOrderInfoCall { orderId: id })
            .await?;
        if info.buyer == Address::ZERO {
            return Err(Self::remote(OP, CallFailure::NotFound(format!("order {id}"))));
        }
        let status = OrderStatus::try_from(info.status)
            .map_err(|e| Self::remote(OP, CallFailure::Decode(e.to_string())))?;
        let matched_at = to_u64(info.matchedAt);
        Ok(Order {
            id,
            buyer: info.buyer,
            material_id: info.materialId,
            status,
            created_at: to_u64(info.createdAt),
            matched_at: (matched_at != 0).then_some(matched_at),
            matched_supplier: (info.matchedSupplier != Address::ZERO).then_some(info.matchedSupplier),
            delivery_location: info.deliveryLocation,
        })
    }

    /// Order ids placed by `buyer` (the connected account when `None`).
    pub async fn get_buyer_orders(&self, buyer: Option<Address>) -> Result<Vec<OrderId>, ClientError> {
        let buyer = self.resolve_account(buyer)?;
        self.read("getBuyerOrders", contract::getBuyerOrdersCall { buyer })
            .await
    }

    /// Material ids listed by `supplier` (the connected account when `None`),
    /// active or not.
    pub async fn get_supplier_materials(
        &self,
        supplier: Option<Address>,
    ) -> Result<Vec<MaterialId>, ClientError> {
        let supplier = self.resolve_account(supplier)?;
        self.read(
            "getSupplierMaterials",
            contract::getSupplierMaterialsCall { supplier },
        )
        .await
    }

    /// Match record of an order; `NotFound` until the order is matched.
    pub async fn get_trade_match(&self, order_id: OrderId) -> Result<TradeMatch, ClientError> {
        const OP: &str = "getTradeMatch";
        let m = self
            .read(OP, contract::getTradeMatchCall { orderId: order_id })
            .await?;
        if m.buyer == Address::ZERO {
            return Err(Self::remote(
                OP,
                CallFailure::NotFound(format!("trade match for order {order_id}")),
            ));
        }
        Ok(TradeMatch {
            order_id,
            material_id: m.materialId,
            buyer: m.buyer,
            supplier: m.supplier,
            timestamp: to_u64(m.timestamp),
            is_confirmed: m.isConfirmed,
        })
    }

    pub async fn is_verified_supplier(&self, account: Option<Address>) -> Verification {
        match self.resolve_account(account) {
            Ok(account) => {
                self.check_flag(
                    "verifiedSuppliers",
                    contract::verifiedSuppliersCall { account },
                )
                .await
            }
            Err(e) => Verification::CheckFailed(e.to_string()),
        }
    }

    pub async fn is_verified_buyer(&self, account: Option<Address>) -> Verification {
        match self.resolve_account(account) {
            Ok(account) => {
                self.check_flag("verifiedBuyers", contract::verifiedBuyersCall { account })
                    .await
            }
            Err(e) => Verification::CheckFailed(e.to_string()),
        }
    }

    async fn check_flag<C>(&self, operation: &'static str, call: C) -> Verification
    where
        C: SolCall<Return = bool>,
    {
        match self.read(operation, call).await {
            Ok(flag) => Verification::from_flag(flag),
            Err(e) => {
                warn!(operation, error = %e, "verification check failed");
                Verification::CheckFailed(e.to_string())
            }
        }
    }

    pub async fn owner(&self) -> Result<Address, ClientError> {
        self.read("owner", contract::ownerCall {}).await
    }

    /// Whether the connected account is the contract owner.
    pub async fn is_owner(&self) -> Result<bool, ClientError> {
        let account = self.resolve_account(None)?;
        let owner = self.owner().await?;
        Ok(owner == account)
    }

    pub async fn next_material_id(&self) -> Result<MaterialId, ClientError> {
        self.read("nextMaterialId", contract::nextMaterialIdCall {})
            .await
    }

    pub async fn next_order_id(&self) -> Result<OrderId, ClientError> {
        self.read("nextOrderId", contract::nextOrderIdCall {}).await
    }

    // ── Writes ───────────────────────────────────────────────────────────────

    /// List a material. The contract only accepts this from verified suppliers;
    /// that is not checked here.
    pub async fn list_material(&self, listing: &MaterialListing) -> Result<TxReceipt, ClientError> {
        listing.validate()?;
        let call = contract::listMaterialCall {
            name: listing.name.clone(),
            category: listing.category.as_u8(),
            quantity: listing.quantity,
            pricePerUnit: listing.price_per_unit,
            minOrder: listing.min_order,
            qualityGrade: listing.quality_grade.clone(),
            deliveryTimeframe: U256::from(listing.delivery_timeframe_days),
        };
        let key = format!(
            "listMaterial:{:?}:{}:{}:{}:{}:{:?}:{}",
            listing.name,
            listing.category.as_u8(),
            listing.quantity,
            listing.price_per_unit,
            listing.min_order,
            listing.quality_grade,
            listing.delivery_timeframe_days,
        );
        self.write("listMaterial", key, call).await
    }

    /// Place an order. Special requirements are cut to 31 characters and sent
    /// as a bytes32.
    pub async fn place_order(&self, request: &OrderRequest) -> Result<TxReceipt, ClientError> {
        request.validate()?;
        let requirements = encode_requirements(&request.special_requirements)?;
        let call = contract::placeOrderCall {
            materialId: request.material_id,
            quantity: request.quantity,
            maxPrice: request.max_price,
            deliveryLocation: request.delivery_location.clone(),
            encryptedSpecialRequirements: requirements,
        };
        // Requirements are keyed as sent, so text differing only past the cut
        // is the same submission.
        let key = format!(
            "placeOrder:{}:{}:{}:{:?}:{}",
            request.material_id,
            request.quantity,
            request.max_price,
            request.delivery_location,
            requirements,
        );
        self.write("placeOrder", key, call).await
    }

    pub async fn match_trade(&self, order_id: OrderId) -> Result<TxReceipt, ClientError> {
        self.write(
            "matchTrade",
            format!("matchTrade:{order_id}"),
            contract::matchTradeCall { orderId: order_id },
        )
        .await
    }

    pub async fn confirm_trade(&self, order_id: OrderId) -> Result<TxReceipt, ClientError> {
        self.write(
            "confirmTrade",
            format!("confirmTrade:{order_id}"),
            contract::confirmTradeCall { orderId: order_id },
        )
        .await
    }

    pub async fn cancel_order(&self, order_id: OrderId) -> Result<TxReceipt, ClientError> {
        self.write(
            "cancelOrder",
            format!("cancelOrder:{order_id}"),
            contract::cancelOrderCall { orderId: order_id },
        )
        .await
    }

    pub async fn deactivate_material(&self, material_id: MaterialId) -> Result<TxReceipt, ClientError> {
        self.write(
            "deactivateMaterial",
            format!("deactivateMaterial:{material_id}"),
            contract::deactivateMaterialCall {
                materialId: material_id,
            },
        )
        .await
    }

    pub async fn verify_supplier(&self, supplier: Address) -> Result<TxReceipt, ClientError> {
        self.write(
            "verifySupplier",
            format!("verifySupplier:{supplier}"),
            contract::verifySupplierCall { supplier },
        )
        .await
    }

    pub async fn verify_buyer(&self, buyer: Address) -> Result<TxReceipt, ClientError> {
        self.write(
            "verifyBuyer",
            format!("verifyBuyer:{buyer}"),
            contract::verifyBuyerCall { buyer },
        )
        .await
    }
}
