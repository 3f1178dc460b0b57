//! Aggregate views built from several adapter reads.

use std::collections::HashSet;

use alloy_primitives::Address;
use rawtrade_types::{Material, MaterialCategory, MaterialId, Order};
use serde::Serialize;
use tracing::warn;

use crate::adapter::ContractAdapter;
use crate::error::ClientError;

/// An order together with the name of the material it is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    /// Empty when the material could not be loaded.
    pub material_name: String,
}

/// Ids of active materials in `filter`, or in every category when `None`.
/// Duplicates are dropped, keeping the first occurrence.
pub async fn active_material_ids(
    adapter: &ContractAdapter,
    filter: Option<MaterialCategory>,
) -> Result<Vec<MaterialId>, ClientError> {
    let categories: Vec<MaterialCategory> = match filter {
        Some(c) => vec![c],
        None => MaterialCategory::ALL.to_vec(),
    };
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for category in categories {
        for id in adapter.get_materials_by_category(category).await? {
            if seen.insert(id) {
                ids.push(id);
            }
        }
    }
    Ok(ids)
}

/// Active materials, resolved. Materials that fail to load are skipped.
pub async fn active_materials(
    adapter: &ContractAdapter,
    filter: Option<MaterialCategory>,
) -> Result<Vec<Material>, ClientError> {
    let ids = active_material_ids(adapter, filter).await?;
    let mut materials = Vec::with_capacity(ids.len());
    for id in ids {
        match adapter.get_material_info(id).await {
            Ok(m) if m.is_active => materials.push(m),
            Ok(_) => {}
            Err(e) => warn!(material_id = %id, error = %e, "skipping material"),
        }
    }
    Ok(materials)
}

/// Orders of `buyer` (the connected account when `None`), oldest first.
pub async fn buyer_orders(
    adapter: &ContractAdapter,
    buyer: Option<Address>,
) -> Result<Vec<OrderView>, ClientError> {
    let ids = adapter.get_buyer_orders(buyer).await?;
    let mut orders = Vec::with_capacity(ids.len());
    for id in ids {
        let order = match adapter.get_order_info(id).await {
            Ok(o) => o,
            Err(e) => {
                warn!(order_id = %id, error = %e, "skipping order");
                continue;
            }
        };
        let material_name = match adapter.get_material_info(order.material_id).await {
            Ok(m) => m.name,
            Err(e) => {
                warn!(material_id = %order.material_id, error = %e, "material lookup failed");
                String::new()
            }
        };
        orders.push(OrderView {
            order,
            material_name,
        });
    }
    Ok(orders)
}

/// Every material of `supplier` (the connected account when `None`),
/// including deactivated ones.
pub async fn supplier_materials(
    adapter: &ContractAdapter,
    supplier: Option<Address>,
) -> Result<Vec<Material>, ClientError> {
    let ids = adapter.get_supplier_materials(supplier).await?;
    let mut materials = Vec::with_capacity(ids.len());
    for id in ids {
        match adapter.get_material_info(id).await {
            Ok(m) => materials.push(m),
            Err(e) => warn!(material_id = %id, error = %e, "skipping material"),
        }
    }
    Ok(materials)
}
