pub mod config_cmd;
pub mod deactivate;
pub mod list_material;
pub mod materials;
pub mod orders;
pub mod place_order;
pub mod status;
pub mod trade;
pub mod verify;

use std::future::Future;

use rawtrade_client::{ClientError, TxReceipt};

use crate::config::CliConfig;
use crate::error::CliError;
use crate::format::{print_divider, print_success, spinner, style_bold, style_dim, style_info};
use crate::prompt::confirm;

/// Show a summary of the transaction about to be sent and ask to go ahead.
/// Returns `false` when the user declines.
pub(crate) fn confirm_submission(
    title: &str,
    rows: &[(&str, String)],
    yes: bool,
) -> Result<bool, CliError> {
    if yes {
        return Ok(true);
    }
    println!();
    println!("  {}", style_bold().apply_to(title));
    print_divider();
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 1;
    for (label, value) in rows {
        println!("  {:<width$} {}", format!("{label}:"), value, width = width);
    }
    println!();
    if !confirm("Send transaction?")? {
        println!("  Cancelled.");
        return Ok(false);
    }
    Ok(true)
}

/// Wait for a write to be mined behind a spinner.
pub(crate) async fn await_receipt<F>(message: &str, write: F) -> Result<TxReceipt, CliError>
where
    F: Future<Output = Result<TxReceipt, ClientError>>,
{
    let pb = spinner(message);
    let result = write.await;
    pb.finish_and_clear();
    Ok(result?)
}

pub(crate) fn print_receipt(config: &CliConfig, receipt: &TxReceipt, done: &str) {
    print_success(done);
    println!(
        "  Tx:    {}",
        style_info().apply_to(receipt.transaction_hash)
    );
    println!("  Block: {}", receipt.block_number);
    println!(
        "  {}",
        style_dim().apply_to(config.tx_url(receipt.transaction_hash))
    );
    println!();
}
