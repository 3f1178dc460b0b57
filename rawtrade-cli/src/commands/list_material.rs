use rawtrade_types::MaterialListing;

use super::{await_receipt, confirm_submission, print_receipt};
use crate::config::CliConfig;
use crate::context::Context;
use crate::error::CliError;
use crate::format::{format_days, style_bold};

pub async fn run(config: CliConfig, listing: MaterialListing, yes: bool) -> Result<(), CliError> {
    listing.validate()?;
    let ctx = Context::signing(config).await?;

    let rows = [
        ("Name", listing.name.clone()),
        ("Category", listing.category.to_string()),
        ("Quantity", listing.quantity.to_string()),
        ("Price/unit", listing.price_per_unit.to_string()),
        ("Min order", listing.min_order.to_string()),
        ("Grade", listing.quality_grade.clone()),
        ("Delivery", format_days(listing.delivery_timeframe_days)),
    ];
    if !confirm_submission("List Material", &rows, yes)? {
        return Ok(());
    }

    let receipt = await_receipt(
        "Listing material...",
        ctx.adapter().list_material(&listing),
    )
    .await?;
    let done = match receipt.listed_material_id() {
        Some(id) => format!(
            "Listed {} as material {}",
            listing.name,
            style_bold().apply_to(format!("#{id}"))
        ),
        None => format!("Listed {}", listing.name),
    };
    print_receipt(&ctx.config, &receipt, &done);
    Ok(())
}
