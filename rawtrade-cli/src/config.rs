use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy_primitives::Address;
use rawtrade_client::rpc::{RpcSettings, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RPC_TIMEOUT_SECS};
use rawtrade_types::constants::{
    DEFAULT_CONTRACT_ADDRESS, DEFAULT_EXPLORER_URL, DEFAULT_RPC_URL, SEPOLIA_CHAIN_ID,
    SEPOLIA_CHAIN_NAME,
};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Client configuration stored in ~/.rawtrade/config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    pub network: NetworkConfig,
    pub contract: ContractConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    /// Chain the endpoint must report; connecting elsewhere is refused.
    pub chain_id: u64,
    pub chain_name: String,
    pub explorer_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractConfig {
    pub address: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// File holding a hex private key. Read when RAWTRADE_PRIVATE_KEY is unset.
    #[serde(default)]
    pub key_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub request_timeout_secs: u64,
    pub receipt_poll_interval_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
            receipt_poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig {
                rpc_url: DEFAULT_RPC_URL.to_string(),
                chain_id: SEPOLIA_CHAIN_ID,
                chain_name: SEPOLIA_CHAIN_NAME.to_string(),
                explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            },
            contract: ContractConfig {
                address: DEFAULT_CONTRACT_ADDRESS,
            },
            wallet: WalletConfig::default(),
            client: ClientConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CliConfig {
    /// Get the data directory (~/.rawtrade/).
    pub fn data_dir() -> Result<PathBuf, CliError> {
        let home = dirs::home_dir().ok_or_else(|| {
            CliError::Config("could not determine home directory".to_string())
        })?;
        Ok(home.join(".rawtrade"))
    }

    pub fn default_path() -> Result<PathBuf, CliError> {
        Ok(Self::data_dir()?.join("config.toml"))
    }

    /// Load config from `path`, writing the defaults there first if the file
    /// does not exist yet.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read config file '{}': {}", path.display(), e))
        })?;
        toml::from_str(&contents).map_err(|e| {
            CliError::Config(format!("failed to parse config file '{}': {}", path.display(), e))
        })
    }

    /// Save config to `path` (mode 0600 on unix).
    pub fn save(&self, path: &Path) -> Result<(), CliError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let data = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))?;

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(data.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            std::fs::write(path, data)?;
        }

        Ok(())
    }

    pub fn rpc_settings(&self) -> RpcSettings {
        RpcSettings {
            url: self.network.rpc_url.clone(),
            contract: self.contract.address,
            request_timeout: Duration::from_secs(self.client.request_timeout_secs),
            poll_interval: Duration::from_millis(self.client.receipt_poll_interval_ms),
        }
    }

    /// Block explorer page for a transaction.
    pub fn tx_url(&self, tx_hash: impl std::fmt::Display) -> String {
        format!("{}/tx/{}", self.network.explorer_url.trim_end_matches('/'), tx_hash)
    }

    /// Block explorer page for an address.
    pub fn address_url(&self, address: &Address) -> String {
        format!(
            "{}/address/{}",
            self.network.explorer_url.trim_end_matches('/'),
            address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_targets_sepolia() {
        let config = CliConfig::default();
        assert_eq!(config.network.chain_id, 11_155_111);
        assert_eq!(config.contract.address, DEFAULT_CONTRACT_ADDRESS);
        assert_eq!(config.logging.level, "warn");
        assert!(config.wallet.key_file.is_none());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = CliConfig::default();
        config.wallet.key_file = Some(PathBuf::from("/tmp/key.hex"));
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let deserialized: CliConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_load_creates_default_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let config = CliConfig::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, CliConfig::default());

        let reloaded = CliConfig::load(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_config_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        CliConfig::default().save(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_missing_optional_sections_use_defaults() {
        let toml_str = r#"
            [network]
            rpc_url = "http://localhost:8545"
            chain_id = 11155111
            chain_name = "Sepolia"
            explorer_url = "https://sepolia.etherscan.io"

            [contract]
            address = "0x57190de0e0bf65ef2356a7bfa0be0a05b0c48827"
        "#;
        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.network.rpc_url, "http://localhost:8545");
        assert_eq!(config.client, ClientConfig::default());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "network = 5").unwrap();
        assert!(matches!(CliConfig::load(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn test_explorer_links() {
        let mut config = CliConfig::default();
        config.network.explorer_url = "https://sepolia.etherscan.io/".to_string();
        assert_eq!(
            config.tx_url("0xabc"),
            "https://sepolia.etherscan.io/tx/0xabc"
        );
        assert!(config
            .address_url(&DEFAULT_CONTRACT_ADDRESS)
            .starts_with("https://sepolia.etherscan.io/address/0x"));
    }
}
