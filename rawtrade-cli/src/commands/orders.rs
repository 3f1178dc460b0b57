use rawtrade_client::catalog::{self, OrderView};
use rawtrade_types::{Order, U256};

use crate::config::CliConfig;
use crate::context::Context;
use crate::error::CliError;
use crate::format::{
    format_address_short, format_status, format_timestamp, print_heading, print_json, spinner,
    style_dim, style_success,
};
use crate::ui::{cell, cell_right, data_table, info_table, print_table};

/// Next-step hint for the buyer, e.g. "rawtrade cancel-order 4".
fn action_hint(order: &Order) -> String {
    order
        .available_actions()
        .iter()
        .map(|a| format!("rawtrade {} {}", a, order.id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `orders`: orders placed by the connected buyer.
pub async fn list(config: CliConfig, json: bool) -> Result<(), CliError> {
    let ctx = Context::signing(config).await?;
    let pb = spinner("Loading your orders...");
    let orders = catalog::buyer_orders(ctx.adapter(), None).await;
    pb.finish_and_clear();
    let orders = orders?;

    if json {
        return print_json(&orders);
    }

    print_heading("Your orders");
    if orders.is_empty() {
        println!("  {}", style_dim().apply_to("No orders yet."));
        println!();
        return Ok(());
    }
    let mut table = data_table(&["ID", "Material", "Status", "Placed", "Deliver to", "Actions"]);
    for OrderView {
        order,
        material_name,
    } in &orders
    {
        let material = if material_name.is_empty() {
            format!("#{}", order.material_id)
        } else {
            format!("{} (#{})", material_name, order.material_id)
        };
        table.add_row(vec![
            cell_right(order.id),
            cell(material),
            cell(format_status(order.status)),
            cell(format_timestamp(order.created_at)),
            cell(&order.delivery_location),
            cell(action_hint(order)),
        ]);
    }
    print_table(&table);
    println!();
    Ok(())
}

/// `order <id>`
pub async fn show(config: CliConfig, id: u64, json: bool) -> Result<(), CliError> {
    let ctx = Context::read_only(config).await?;
    let order = ctx.adapter().get_order_info(U256::from(id)).await?;

    if json {
        return print_json(&order);
    }

    print_heading(&format!("Order #{}", order.id));
    let mut table = info_table();
    table.add_row(vec![cell("Buyer"), cell(order.buyer)]);
    table.add_row(vec![cell("Material"), cell(format!("#{}", order.material_id))]);
    table.add_row(vec![cell("Status"), cell(format_status(order.status))]);
    table.add_row(vec![cell("Placed"), cell(format_timestamp(order.created_at))]);
    if let Some(at) = order.matched_at {
        table.add_row(vec![cell("Matched"), cell(format_timestamp(at))]);
    }
    if let Some(supplier) = order.matched_supplier {
        table.add_row(vec![cell("Supplier"), cell(supplier)]);
    }
    table.add_row(vec![cell("Deliver to"), cell(&order.delivery_location)]);
    print_table(&table);

    if !order.available_actions().is_empty() {
        println!("  {} {}", style_dim().apply_to("Next:"), action_hint(&order));
    }
    println!();
    Ok(())
}

/// `trade-match <order-id>`
pub async fn trade_match(config: CliConfig, order_id: u64, json: bool) -> Result<(), CliError> {
    let ctx = Context::read_only(config).await?;
    let deal = ctx.adapter().get_trade_match(U256::from(order_id)).await?;

    if json {
        return print_json(&deal);
    }

    print_heading(&format!("Trade match for order #{}", deal.order_id));
    let mut table = info_table();
    table.add_row(vec![cell("Material"), cell(format!("#{}", deal.material_id))]);
    table.add_row(vec![cell("Buyer"), cell(format_address_short(&deal.buyer))]);
    table.add_row(vec![cell("Supplier"), cell(format_address_short(&deal.supplier))]);
    table.add_row(vec![cell("Matched"), cell(format_timestamp(deal.timestamp))]);
    table.add_row(vec![
        cell("Confirmed"),
        cell(if deal.is_confirmed {
            style_success().apply_to("yes").to_string()
        } else {
            "no".to_string()
        }),
    ]);
    print_table(&table);
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawtrade_types::{Address, OrderStatus};

    fn order(status: OrderStatus) -> Order {
        Order {
            id: U256::from(4u64),
            buyer: Address::repeat_byte(1),
            material_id: U256::from(2u64),
            status,
            created_at: 1_700_000_000,
            matched_at: None,
            matched_supplier: None,
            delivery_location: "Antwerp".to_string(),
        }
    }

    #[test]
    fn test_action_hint_follows_status() {
        assert_eq!(
            action_hint(&order(OrderStatus::Pending)),
            "rawtrade cancel-order 4"
        );
        assert_eq!(
            action_hint(&order(OrderStatus::Matched)),
            "rawtrade confirm-trade 4"
        );
        assert_eq!(action_hint(&order(OrderStatus::Completed)), "");
        assert_eq!(action_hint(&order(OrderStatus::Cancelled)), "");
    }
}
