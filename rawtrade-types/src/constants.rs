use alloy_primitives::{address, Address};

// ─── Network ─────────────────────────────────────────────────────────────────

/// Chain ID of the Sepolia testnet, where the trading contract is deployed.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Human-readable name of the target network.
pub const SEPOLIA_CHAIN_NAME: &str = "Sepolia Testnet";

/// Public JSON-RPC endpoint used when no other endpoint is configured.
pub const DEFAULT_RPC_URL: &str = "https://rpc.sepolia.org";

/// Block explorer for transaction links.
pub const DEFAULT_EXPLORER_URL: &str = "https://sepolia.etherscan.io";

// ─── Contract ────────────────────────────────────────────────────────────────

/// Address of the deployed raw-materials trading contract.
pub const DEFAULT_CONTRACT_ADDRESS: Address = address!("57190de0e0bf65ef2356a7bfa0be0a05b0c48827");

/// Number of material categories indexed by the contract.
pub const CATEGORY_COUNT: u8 = 6;

/// Maximum number of characters of special requirements sent with an order.
/// The contract stores them in a single `bytes32`, which leaves 31 bytes
/// after the NUL terminator.
pub const MAX_SPECIAL_REQUIREMENTS_CHARS: usize = 31;
