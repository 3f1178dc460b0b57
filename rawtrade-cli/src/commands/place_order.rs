use rawtrade_types::requirements::truncate_requirements;
use rawtrade_types::OrderRequest;

use super::{await_receipt, confirm_submission, print_receipt};
use crate::config::CliConfig;
use crate::context::Context;
use crate::error::CliError;
use crate::format::{style_bold, style_warn};

pub async fn run(config: CliConfig, request: OrderRequest, yes: bool) -> Result<(), CliError> {
    request.validate()?;
    let ctx = Context::signing(config).await?;

    // Show which material this is before asking; an unknown id fails here.
    let material = ctx.adapter().get_material_info(request.material_id).await?;

    let kept = truncate_requirements(&request.special_requirements);
    if kept.len() < request.special_requirements.len() {
        println!(
            "  {} special requirements are cut to \"{}\"",
            style_warn().apply_to("Note:"),
            kept
        );
    }

    let rows = [
        (
            "Material",
            format!("{} (#{})", material.name, request.material_id),
        ),
        ("Quantity", request.quantity.to_string()),
        ("Max price", request.max_price.to_string()),
        ("Deliver to", request.delivery_location.clone()),
        ("Requirements", kept.to_string()),
    ];
    if !confirm_submission("Place Order", &rows, yes)? {
        return Ok(());
    }

    let receipt = await_receipt("Placing order...", ctx.adapter().place_order(&request)).await?;
    let done = match receipt.placed_order_id() {
        Some(id) => format!(
            "Order {} placed for {}",
            style_bold().apply_to(format!("#{id}")),
            material.name
        ),
        None => format!("Order placed for {}", material.name),
    };
    print_receipt(&ctx.config, &receipt, &done);
    Ok(())
}
