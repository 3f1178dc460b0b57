use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rawtrade_types::MaterialCategory;

use crate::commands;
use crate::config::CliConfig;
use crate::error::CliError;

#[derive(Parser)]
#[command(
    name = "rawtrade",
    about = "Trade raw materials through the on-chain trading contract (Sepolia)",
    version
)]
pub struct Cli {
    /// Path to config file (defaults to ~/.rawtrade/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Override RPC URL for this command
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the connected account and its roles
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List active materials
    Materials {
        /// Only this category (name or index 0-5)
        #[arg(long)]
        category: Option<MaterialCategory>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one material
    Material {
        /// Material id
        id: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List materials of the connected supplier, active or not
    MyMaterials {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List orders of the connected buyer
    Orders {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one order
    Order {
        /// Order id
        id: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the match record of an order
    TradeMatch {
        /// Order id
        order_id: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List a material for sale (verified suppliers)
    ListMaterial {
        /// Material name
        #[arg(long)]
        name: String,
        /// Category (name or index 0-5)
        #[arg(long)]
        category: MaterialCategory,
        /// Available quantity
        #[arg(long)]
        quantity: u32,
        /// Price per unit
        #[arg(long)]
        price: u64,
        /// Minimum order quantity
        #[arg(long)]
        min_order: u32,
        /// Quality grade, e.g. "A" or "ISO 9001"
        #[arg(long)]
        quality_grade: String,
        /// Delivery timeframe in days
        #[arg(long)]
        delivery_days: u64,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Place an order for a material (verified buyers)
    PlaceOrder {
        /// Material id
        #[arg(long)]
        material: u64,
        /// Quantity to order
        #[arg(long)]
        quantity: u32,
        /// Highest acceptable price per unit
        #[arg(long)]
        max_price: u64,
        /// Delivery location
        #[arg(long)]
        delivery_location: String,
        /// Special requirements; only the first 31 characters are kept
        #[arg(long, default_value = "")]
        requirements: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Match a pending order against your material (supplier)
    MatchTrade {
        /// Order id
        order_id: u64,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Confirm a matched order (buyer)
    ConfirmTrade {
        /// Order id
        order_id: u64,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Cancel a pending order (buyer)
    CancelOrder {
        /// Order id
        order_id: u64,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Take one of your materials off the market (supplier)
    DeactivateMaterial {
        /// Material id
        id: u64,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Mark an address as a verified supplier (owner)
    VerifySupplier {
        /// Supplier address
        address: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Mark an address as a verified buyer (owner)
    VerifyBuyer {
        /// Buyer address
        address: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show or update configuration (`--rpc-url` here saves the endpoint)
    Config {
        /// Set the private key file
        #[arg(long)]
        key_file: Option<PathBuf>,
        /// Set the contract address
        #[arg(long)]
        contract: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn config_path(&self) -> Result<PathBuf, CliError> {
        match &self.config {
            Some(p) => Ok(p.clone()),
            None => CliConfig::default_path(),
        }
    }
}

/// Run a parsed command against `config` (loaded from `config_path`).
pub async fn run(cli: Cli, mut config: CliConfig, config_path: PathBuf) -> Result<(), CliError> {
    if let Some(url) = &cli.rpc_url {
        config.network.rpc_url = url.clone();
    }

    match cli.command {
        Command::Status { json } => commands::status::run(config, json).await,
        Command::Materials { category, json } => {
            commands::materials::list(config, category, json).await
        }
        Command::Material { id, json } => commands::materials::show(config, id, json).await,
        Command::MyMaterials { json } => commands::materials::mine(config, json).await,
        Command::Orders { json } => commands::orders::list(config, json).await,
        Command::Order { id, json } => commands::orders::show(config, id, json).await,
        Command::TradeMatch { order_id, json } => {
            commands::orders::trade_match(config, order_id, json).await
        }
        Command::ListMaterial {
            name,
            category,
            quantity,
            price,
            min_order,
            quality_grade,
            delivery_days,
            yes,
        } => {
            let listing = rawtrade_types::MaterialListing {
                name,
                category,
                quantity,
                price_per_unit: price,
                min_order,
                quality_grade,
                delivery_timeframe_days: delivery_days,
            };
            commands::list_material::run(config, listing, yes).await
        }
        Command::PlaceOrder {
            material,
            quantity,
            max_price,
            delivery_location,
            requirements,
            yes,
        } => {
            let request = rawtrade_types::OrderRequest {
                material_id: rawtrade_types::U256::from(material),
                quantity,
                max_price,
                delivery_location,
                special_requirements: requirements,
            };
            commands::place_order::run(config, request, yes).await
        }
        Command::MatchTrade { order_id, yes } => {
            commands::trade::match_trade(config, order_id, yes).await
        }
        Command::ConfirmTrade { order_id, yes } => {
            commands::trade::confirm_trade(config, order_id, yes).await
        }
        Command::CancelOrder { order_id, yes } => {
            commands::trade::cancel_order(config, order_id, yes).await
        }
        Command::DeactivateMaterial { id, yes } => {
            commands::deactivate::run(config, id, yes).await
        }
        Command::VerifySupplier { address, yes } => {
            commands::verify::run(config, commands::verify::Role::Supplier, &address, yes).await
        }
        Command::VerifyBuyer { address, yes } => {
            commands::verify::run(config, commands::verify::Role::Buyer, &address, yes).await
        }
        Command::Config {
            key_file,
            contract,
            json,
        } => commands::config_cmd::run(
            &config_path,
            cli.rpc_url.as_deref(),
            key_file,
            contract.as_deref(),
            json,
        ),
    }
}
