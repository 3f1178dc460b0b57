use rawtrade_client::{CallFailure, ClientError};
use rawtrade_types::DomainError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("invalid input: {0}")]
    Invalid(#[from] DomainError),

    #[error("no private key available")]
    NoKey,

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl CliError {
    /// A short suggestion shown under the error message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::NoKey | CliError::InvalidKey(_) => Some(
                "set RAWTRADE_PRIVATE_KEY or point `wallet.key_file` at a hex key with `rawtrade config --key-file <path>`",
            ),
            CliError::Config(_) => Some("fix or delete ~/.rawtrade/config.toml to regenerate it"),
            CliError::Client(ClientError::WrongNetwork { .. }) => {
                Some("point `network.rpc_url` at a Sepolia endpoint with `rawtrade config --rpc-url <url>`")
            }
            CliError::Client(ClientError::Connect(_)) => {
                Some("check that the RPC endpoint is reachable")
            }
            CliError::Client(ClientError::Remote(e)) => match &e.cause {
                CallFailure::Reverted(_) => {
                    Some("the contract rejected the call; run `rawtrade status` to check your roles")
                }
                CallFailure::NotFound(_) => Some("check the id; `rawtrade materials` lists what exists"),
                _ => None,
            },
            _ => None,
        }
    }
}
