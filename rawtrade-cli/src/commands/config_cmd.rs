use std::path::{Path, PathBuf};

use rawtrade_types::primitives::parse_address;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::format::{print_heading, print_json, print_success};
use crate::signer::PRIVATE_KEY_ENV;
use crate::ui::{cell, info_table, print_table};

pub fn run(
    path: &Path,
    rpc_url: Option<&str>,
    key_file: Option<PathBuf>,
    contract: Option<&str>,
    json: bool,
) -> Result<(), CliError> {
    let mut config = CliConfig::load(path)?;

    if rpc_url.is_some() || key_file.is_some() || contract.is_some() {
        if let Some(file) = &key_file {
            if !file.exists() {
                return Err(CliError::Config(format!(
                    "key file '{}' does not exist",
                    file.display()
                )));
            }
        }
        let contract = contract.map(parse_address).transpose()?;

        if let Some(url) = rpc_url {
            config.network.rpc_url = url.to_string();
        }
        if let Some(file) = &key_file {
            config.wallet.key_file = Some(file.clone());
        }
        if let Some(addr) = contract {
            config.contract.address = addr;
        }
        config.save(path)?;

        if let Some(url) = rpc_url {
            print_success(&format!("RPC URL set to {}", url));
        }
        if let Some(file) = key_file {
            print_success(&format!("Key file set to {}", file.display()));
        }
        if let Some(addr) = contract {
            print_success(&format!("Contract set to {}", addr));
        }
        return Ok(());
    }

    if json {
        return print_json(&serde_json::json!({
            "config_path": path.to_string_lossy(),
            "network": config.network,
            "contract": config.contract,
            "wallet": config.wallet,
            "client": config.client,
            "logging": config.logging,
        }));
    }

    print_heading("Configuration");
    let mut table = info_table();
    table.add_row(vec![cell("Config file"), cell(path.display())]);
    table.add_row(vec![cell("RPC URL"), cell(&config.network.rpc_url)]);
    table.add_row(vec![
        cell("Network"),
        cell(format!(
            "{} ({})",
            config.network.chain_name, config.network.chain_id
        )),
    ]);
    table.add_row(vec![cell("Explorer"), cell(&config.network.explorer_url)]);
    table.add_row(vec![cell("Contract"), cell(config.contract.address)]);
    let key_source = match (&config.wallet.key_file, std::env::var(PRIVATE_KEY_ENV).is_ok()) {
        (_, true) => format!("${}", PRIVATE_KEY_ENV),
        (Some(file), false) => file.display().to_string(),
        (None, false) => "(prompt)".to_string(),
    };
    table.add_row(vec![cell("Key"), cell(key_source)]);
    table.add_row(vec![
        cell("Timeout"),
        cell(format!("{}s", config.client.request_timeout_secs)),
    ]);
    table.add_row(vec![cell("Log level"), cell(&config.logging.level)]);
    print_table(&table);
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updates_are_saved() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let key = tmp.path().join("key.hex");
        std::fs::write(&key, "00").unwrap();

        run(
            &path,
            Some("http://localhost:8545"),
            Some(key.clone()),
            Some("0x57190de0e0bf65ef2356a7bfa0be0a05b0c48827"),
            false,
        )
        .unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.network.rpc_url, "http://localhost:8545");
        assert_eq!(config.wallet.key_file, Some(key));
    }

    #[test]
    fn test_missing_key_file_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let err = run(
            &path,
            None,
            Some(tmp.path().join("absent.hex")),
            None,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_rejected_update_saves_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let err = run(
            &path,
            Some("http://localhost:8545"),
            Some(tmp.path().join("absent.hex")),
            None,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.network.rpc_url, CliConfig::default().network.rpc_url);
    }

    #[test]
    fn test_bad_contract_address_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let err = run(&path, None, None, Some("0x1234"), false).unwrap_err();
        assert!(matches!(err, CliError::Invalid(_)));
        // Nothing was written past the defaults.
        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config, CliConfig::default());
    }
}
