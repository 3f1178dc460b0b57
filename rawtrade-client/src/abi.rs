//! Solidity bindings for `ConfidentialRawMaterialsTrading`.
//!
//! Enum arguments (`MaterialCategory`, `OrderStatus`) are ABI-encoded as
//! `uint8` and declared that way here; conversion to the typed enums happens
//! in the adapter.

use alloy_primitives::U256;
use alloy_sol_types::{sol, SolEvent};
use rawtrade_types::{MaterialId, OrderId};

use crate::transport::TxReceipt;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IRawMaterialsTrading {
        event BuyerVerified(address indexed buyer);
        event MaterialListed(uint256 indexed materialId, address indexed supplier, uint8 category);
        event OrderPlaced(uint256 indexed orderId, address indexed buyer, uint256 indexed materialId);
        event SupplierVerified(address indexed supplier);
        event TradeCompleted(uint256 indexed orderId, uint256 indexed materialId);
        event TradeMatched(uint256 indexed orderId, uint256 indexed materialId, address indexed buyer, address supplier);

        function owner() external view returns (address);
        function nextMaterialId() external view returns (uint256);
        function nextOrderId() external view returns (uint256);
        function verifiedSuppliers(address account) external view returns (bool);
        function verifiedBuyers(address account) external view returns (bool);

        function getMaterialInfo(uint256 materialId) external view returns (
            string name,
            uint8 category,
            address supplier,
            bool isActive,
            uint256 createdAt,
            string qualityGrade,
            uint256 deliveryTimeframe
        );
        function getMaterialsByCategory(uint8 category) external view returns (uint256[] activeMaterials);
        function getSupplierMaterials(address supplier) external view returns (uint256[]);
        function getOrderInfo(uint256 orderId) external view returns (
            address buyer,
            uint256 materialId,
            uint8 status,
            uint256 createdAt,
            uint256 matchedAt,
            address matchedSupplier,
            string deliveryLocation
        );
        function getBuyerOrders(address buyer) external view returns (uint256[]);
        function getTradeMatch(uint256 orderId) external view returns (
            uint256 materialId,
            address buyer,
            address supplier,
            uint256 timestamp,
            bool isConfirmed
        );

        function listMaterial(
            string name,
            uint8 category,
            uint32 quantity,
            uint64 pricePerUnit,
            uint32 minOrder,
            string qualityGrade,
            uint256 deliveryTimeframe
        ) external;
        function placeOrder(
            uint256 materialId,
            uint32 quantity,
            uint64 maxPrice,
            string deliveryLocation,
            bytes32 encryptedSpecialRequirements
        ) external;
        function matchTrade(uint256 orderId) external;
        function confirmTrade(uint256 orderId) external;
        function cancelOrder(uint256 orderId) external;
        function deactivateMaterial(uint256 materialId) external;
        function verifySupplier(address supplier) external;
        function verifyBuyer(address buyer) external;
    }
}

/// First indexed `uint256` of the first log in `receipt` emitted as event `E`.
fn first_indexed_id<E: SolEvent>(receipt: &TxReceipt) -> Option<U256> {
    receipt
        .logs
        .iter()
        .find(|log| log.topics.first() == Some(&E::SIGNATURE_HASH))
        .and_then(|log| log.topics.get(1))
        .map(|topic| U256::from_be_bytes(topic.0))
}

impl TxReceipt {
    /// Id assigned by a successful `listMaterial`, read from `MaterialListed`.
    pub fn listed_material_id(&self) -> Option<MaterialId> {
        first_indexed_id::<IRawMaterialsTrading::MaterialListed>(self)
    }

    /// Id assigned by a successful `placeOrder`, read from `OrderPlaced`.
    pub fn placed_order_id(&self) -> Option<OrderId> {
        first_indexed_id::<IRawMaterialsTrading::OrderPlaced>(self)
    }
}

#[cfg(test)]
mod tests {
    use super::IRawMaterialsTrading::*;
    use super::*;
    use alloy_primitives::{Address, Bytes, B256};
    use alloy_sol_types::SolCall;

    use crate::transport::TxLog;

    #[test]
    fn test_selectors_match_deployed_abi() {
        assert_eq!(getMaterialInfoCall::SIGNATURE, "getMaterialInfo(uint256)");
        assert_eq!(getMaterialsByCategoryCall::SIGNATURE, "getMaterialsByCategory(uint8)");
        assert_eq!(
            listMaterialCall::SIGNATURE,
            "listMaterial(string,uint8,uint32,uint64,uint32,string,uint256)"
        );
        assert_eq!(
            placeOrderCall::SIGNATURE,
            "placeOrder(uint256,uint32,uint64,string,bytes32)"
        );
        assert_eq!(verifiedSuppliersCall::SIGNATURE, "verifiedSuppliers(address)");
    }

    #[test]
    fn test_event_signatures() {
        assert_eq!(
            MaterialListed::SIGNATURE,
            "MaterialListed(uint256,address,uint8)"
        );
        assert_eq!(
            OrderPlaced::SIGNATURE,
            "OrderPlaced(uint256,address,uint256)"
        );
    }

    fn receipt_with(topics: Vec<B256>) -> TxReceipt {
        TxReceipt {
            transaction_hash: B256::repeat_byte(1),
            block_number: 10,
            gas_used: 21_000,
            success: true,
            logs: vec![TxLog {
                address: Address::repeat_byte(9),
                topics,
                data: Bytes::new(),
            }],
        }
    }

    #[test]
    fn test_listed_material_id_from_logs() {
        let id = U256::from(42u64);
        let receipt = receipt_with(vec![
            MaterialListed::SIGNATURE_HASH,
            B256::from(id.to_be_bytes::<32>()),
            Address::repeat_byte(7).into_word(),
        ]);
        assert_eq!(receipt.listed_material_id(), Some(id));
        assert_eq!(receipt.placed_order_id(), None);
    }

    #[test]
    fn test_placed_order_id_from_logs() {
        let id = U256::from(5u64);
        let receipt = receipt_with(vec![
            OrderPlaced::SIGNATURE_HASH,
            B256::from(id.to_be_bytes::<32>()),
            Address::repeat_byte(7).into_word(),
            B256::from(U256::from(1u64).to_be_bytes::<32>()),
        ]);
        assert_eq!(receipt.placed_order_id(), Some(id));
    }
}
