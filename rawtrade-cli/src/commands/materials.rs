use rawtrade_client::catalog;
use rawtrade_types::{Material, MaterialCategory, U256};

use crate::config::CliConfig;
use crate::context::Context;
use crate::error::CliError;
use crate::format::{
    format_active, format_address_short, format_days, format_timestamp, print_heading, print_json,
    spinner, style_dim,
};
use crate::ui::{cell, cell_right, data_table, info_table, print_table};

/// `materials`: active listings, optionally in one category.
pub async fn list(
    config: CliConfig,
    category: Option<MaterialCategory>,
    json: bool,
) -> Result<(), CliError> {
    let ctx = Context::read_only(config).await?;
    let pb = spinner("Loading materials...");
    let materials = catalog::active_materials(ctx.adapter(), category).await;
    pb.finish_and_clear();
    let materials = materials?;

    if json {
        return print_json(&materials);
    }
    let title = match category {
        Some(c) => format!("Materials: {}", c),
        None => "Materials".to_string(),
    };
    print_materials(&title, &materials, false);
    Ok(())
}

/// `my-materials`: everything the connected supplier has listed.
pub async fn mine(config: CliConfig, json: bool) -> Result<(), CliError> {
    let ctx = Context::signing(config).await?;
    let pb = spinner("Loading your materials...");
    let materials = catalog::supplier_materials(ctx.adapter(), None).await;
    pb.finish_and_clear();
    let materials = materials?;

    if json {
        return print_json(&materials);
    }
    print_materials("Your materials", &materials, true);
    Ok(())
}

/// `material <id>`
pub async fn show(config: CliConfig, id: u64, json: bool) -> Result<(), CliError> {
    let ctx = Context::read_only(config).await?;
    let material = ctx.adapter().get_material_info(U256::from(id)).await?;

    if json {
        return print_json(&material);
    }

    print_heading(&format!("Material #{}", material.id));
    let mut table = info_table();
    table.add_row(vec![cell("Name"), cell(&material.name)]);
    table.add_row(vec![cell("Category"), cell(material.category)]);
    table.add_row(vec![cell("Supplier"), cell(material.supplier)]);
    table.add_row(vec![cell("Status"), cell(format_active(material.is_active))]);
    table.add_row(vec![cell("Quality grade"), cell(&material.quality_grade)]);
    table.add_row(vec![
        cell("Delivery"),
        cell(format_days(material.delivery_timeframe_days)),
    ]);
    table.add_row(vec![cell("Listed"), cell(format_timestamp(material.created_at))]);
    print_table(&table);
    println!();
    Ok(())
}

fn print_materials(title: &str, materials: &[Material], show_status: bool) {
    print_heading(title);
    if materials.is_empty() {
        println!("  {}", style_dim().apply_to("No materials found."));
        println!();
        return;
    }

    let mut headers = vec!["ID", "Name", "Category", "Grade", "Delivery", "Supplier"];
    if show_status {
        headers.push("Status");
    }
    let mut table = data_table(&headers);
    for m in materials {
        let mut row = vec![
            cell_right(m.id),
            cell(&m.name),
            cell(m.category),
            cell(&m.quality_grade),
            cell_right(format_days(m.delivery_timeframe_days)),
            cell(format_address_short(&m.supplier)),
        ];
        if show_status {
            row.push(cell(format_active(m.is_active)));
        }
        table.add_row(row);
    }
    print_table(&table);
    println!();
}
