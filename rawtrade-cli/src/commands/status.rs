use crate::config::CliConfig;
use crate::context::Context;
use crate::error::CliError;
use crate::format::{format_verification, print_heading, print_json, style_info};
use crate::ui::{cell, info_table, print_table};

pub async fn run(config: CliConfig, json: bool) -> Result<(), CliError> {
    let ctx = Context::signing(config).await?;
    let overview = ctx.session.overview().await?;

    if json {
        return print_json(&overview);
    }

    print_heading("Account");
    let mut table = info_table();
    table.add_row(vec![
        cell("Address"),
        cell(style_info().apply_to(overview.account)),
    ]);
    table.add_row(vec![
        cell("Network"),
        cell(format!(
            "{} ({})",
            ctx.config.network.chain_name, ctx.config.network.chain_id
        )),
    ]);
    table.add_row(vec![
        cell("Supplier"),
        cell(format_verification(&overview.supplier)),
    ]);
    table.add_row(vec![cell("Buyer"), cell(format_verification(&overview.buyer))]);
    table.add_row(vec![
        cell("Owner"),
        cell(if overview.is_owner { "yes" } else { "no" }),
    ]);
    table.add_row(vec![
        cell("Contract"),
        cell(ctx.config.address_url(&ctx.config.contract.address)),
    ]);
    print_table(&table);
    println!();

    Ok(())
}
