use std::path::Path;

use alloy_signer_local::PrivateKeySigner;
use tracing::debug;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::prompt::prompt_private_key;

pub const PRIVATE_KEY_ENV: &str = "RAWTRADE_PRIVATE_KEY";

/// Parse a hex private key, with or without `0x`.
pub fn parse_private_key(s: &str) -> Result<PrivateKeySigner, CliError> {
    s.trim()
        .parse::<PrivateKeySigner>()
        .map_err(|e| CliError::InvalidKey(e.to_string()))
}

fn read_key_file(path: &Path) -> Result<PrivateKeySigner, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        CliError::InvalidKey(format!("cannot read key file '{}': {}", path.display(), e))
    })?;
    parse_private_key(&contents)
}

/// Key from the environment or the configured key file, without prompting.
pub fn configured_signer(config: &CliConfig) -> Result<Option<PrivateKeySigner>, CliError> {
    if let Ok(key) = std::env::var(PRIVATE_KEY_ENV) {
        if !key.trim().is_empty() {
            debug!("using key from {}", PRIVATE_KEY_ENV);
            return parse_private_key(&key).map(Some);
        }
    }
    match &config.wallet.key_file {
        Some(path) => {
            debug!(path = %path.display(), "using key file");
            read_key_file(path).map(Some)
        }
        None => Ok(None),
    }
}

/// The signing identity, falling back to an interactive prompt.
pub fn load_signer(config: &CliConfig) -> Result<PrivateKeySigner, CliError> {
    if let Some(signer) = configured_signer(config)? {
        return Ok(signer);
    }
    let key = prompt_private_key()?;
    if key.trim().is_empty() {
        return Err(CliError::NoKey);
    }
    parse_private_key(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known development key (anvil account #0).
    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_parse_private_key_with_and_without_prefix() {
        let a = parse_private_key(DEV_KEY).unwrap();
        let b = parse_private_key(&format!("0x{DEV_KEY}\n")).unwrap();
        assert_eq!(a.address(), b.address());
        assert_eq!(a.address().to_string(), DEV_ADDRESS);
    }

    #[test]
    fn test_parse_private_key_rejects_garbage() {
        assert!(matches!(
            parse_private_key("not-a-key"),
            Err(CliError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_key_file_is_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("key.hex");
        std::fs::write(&path, DEV_KEY).unwrap();
        let signer = read_key_file(&path).unwrap();
        assert_eq!(signer.address().to_string(), DEV_ADDRESS);
    }

    #[test]
    fn test_missing_key_file_is_key_error() {
        let err = read_key_file(Path::new("/nonexistent/key.hex")).unwrap_err();
        assert!(matches!(err, CliError::InvalidKey(_)));
    }
}
