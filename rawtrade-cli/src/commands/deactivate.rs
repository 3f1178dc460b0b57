use rawtrade_types::U256;

use super::{await_receipt, confirm_submission, print_receipt};
use crate::config::CliConfig;
use crate::context::Context;
use crate::error::CliError;

pub async fn run(config: CliConfig, material_id: u64, yes: bool) -> Result<(), CliError> {
    let ctx = Context::signing(config).await?;
    let id = U256::from(material_id);
    let material = ctx.adapter().get_material_info(id).await?;

    let rows = [
        ("Material", format!("{} (#{})", material.name, id)),
        ("Category", material.category.to_string()),
    ];
    if !confirm_submission("Deactivate Material", &rows, yes)? {
        return Ok(());
    }

    let receipt = await_receipt(
        "Deactivating material...",
        ctx.adapter().deactivate_material(id),
    )
    .await?;
    print_receipt(
        &ctx.config,
        &receipt,
        &format!("{} is no longer listed", material.name),
    );
    Ok(())
}
