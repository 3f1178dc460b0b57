use rawtrade_types::primitives::parse_address;

use super::{await_receipt, confirm_submission, print_receipt};
use crate::config::CliConfig;
use crate::context::Context;
use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Supplier,
    Buyer,
}

impl Role {
    fn name(self) -> &'static str {
        match self {
            Role::Supplier => "supplier",
            Role::Buyer => "buyer",
        }
    }
}

/// `verify-supplier` / `verify-buyer` (contract owner only).
pub async fn run(config: CliConfig, role: Role, address: &str, yes: bool) -> Result<(), CliError> {
    // Reject malformed input before touching the network.
    let target = parse_address(address)?;
    let ctx = Context::signing(config).await?;

    let rows = [("Address", target.to_string()), ("Role", role.name().to_string())];
    let title = match role {
        Role::Supplier => "Verify Supplier",
        Role::Buyer => "Verify Buyer",
    };
    if !confirm_submission(title, &rows, yes)? {
        return Ok(());
    }

    let receipt = match role {
        Role::Supplier => {
            await_receipt("Verifying supplier...", ctx.adapter().verify_supplier(target)).await?
        }
        Role::Buyer => await_receipt("Verifying buyer...", ctx.adapter().verify_buyer(target)).await?,
    };
    print_receipt(
        &ctx.config,
        &receipt,
        &format!("{} is now a verified {}", target, role.name()),
    );
    Ok(())
}
