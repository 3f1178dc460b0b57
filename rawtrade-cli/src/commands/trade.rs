use rawtrade_types::U256;

use super::{await_receipt, confirm_submission, print_receipt};
use crate::config::CliConfig;
use crate::context::Context;
use crate::error::CliError;
use crate::format::format_status;

/// Load the order so the summary shows what is being acted on.
async fn order_rows(ctx: &Context, order_id: U256) -> Result<Vec<(&'static str, String)>, CliError> {
    let order = ctx.adapter().get_order_info(order_id).await?;
    Ok(vec![
        ("Order", format!("#{}", order.id)),
        ("Material", format!("#{}", order.material_id)),
        ("Status", format_status(order.status).to_string()),
        ("Buyer", order.buyer.to_string()),
    ])
}

pub async fn match_trade(config: CliConfig, order_id: u64, yes: bool) -> Result<(), CliError> {
    let ctx = Context::signing(config).await?;
    let id = U256::from(order_id);
    if !confirm_submission("Match Trade", &order_rows(&ctx, id).await?, yes)? {
        return Ok(());
    }
    let receipt = await_receipt("Matching trade...", ctx.adapter().match_trade(id)).await?;
    print_receipt(&ctx.config, &receipt, &format!("Order #{order_id} matched"));
    Ok(())
}

pub async fn confirm_trade(config: CliConfig, order_id: u64, yes: bool) -> Result<(), CliError> {
    let ctx = Context::signing(config).await?;
    let id = U256::from(order_id);
    if !confirm_submission("Confirm Trade", &order_rows(&ctx, id).await?, yes)? {
        return Ok(());
    }
    let receipt = await_receipt("Confirming trade...", ctx.adapter().confirm_trade(id)).await?;
    print_receipt(&ctx.config, &receipt, &format!("Order #{order_id} completed"));
    Ok(())
}

pub async fn cancel_order(config: CliConfig, order_id: u64, yes: bool) -> Result<(), CliError> {
    let ctx = Context::signing(config).await?;
    let id = U256::from(order_id);
    if !confirm_submission("Cancel Order", &order_rows(&ctx, id).await?, yes)? {
        return Ok(());
    }
    let receipt = await_receipt("Cancelling order...", ctx.adapter().cancel_order(id)).await?;
    print_receipt(&ctx.config, &receipt, &format!("Order #{order_id} cancelled"));
    Ok(())
}
