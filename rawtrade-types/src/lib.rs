pub mod constants;
pub mod error;
pub mod material;
pub mod order;
pub mod primitives;
pub mod requirements;

pub use error::DomainError;
pub use material::{Material, MaterialCategory, MaterialListing};
pub use order::{Order, OrderAction, OrderRequest, OrderStatus, TradeMatch};
pub use primitives::{Address, MaterialId, OrderId, Timestamp, B256, U256};

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: serde JSON round-trip for types exposed through `--json` output.
    fn json_roundtrip<T>(value: &T)
    where
        T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let encoded = serde_json::to_string(value).expect("json serialize failed");
        let decoded: T = serde_json::from_str(&encoded).expect("json deserialize failed");
        assert_eq!(*value, decoded);
    }

    #[test]
    fn test_material_json_roundtrip() {
        let material = Material {
            id: U256::from(7u64),
            name: "Copper cathode".to_string(),
            category: MaterialCategory::Metals,
            supplier: Address::repeat_byte(0x11),
            is_active: true,
            created_at: 1_700_000_000,
            quality_grade: "Grade A".to_string(),
            delivery_timeframe_days: 14,
        };
        json_roundtrip(&material);
    }

    #[test]
    fn test_order_json_roundtrip() {
        let order = Order {
            id: U256::from(3u64),
            buyer: Address::repeat_byte(0x22),
            material_id: U256::from(7u64),
            status: OrderStatus::Matched,
            created_at: 1_700_000_100,
            matched_at: Some(1_700_000_200),
            matched_supplier: Some(Address::repeat_byte(0x11)),
            delivery_location: "Rotterdam".to_string(),
        };
        json_roundtrip(&order);
    }
}
