pub use alloy_primitives::{Address, B256, U256};

use crate::error::DomainError;

/// Identifier of a listed material (`uint256` on the contract).
pub type MaterialId = U256;

/// Identifier of a buyer order (`uint256` on the contract).
pub type OrderId = U256;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Convert a remote `uint256` timestamp or day count into a `u64`.
/// Values beyond `u64::MAX` cannot come from a real block and saturate.
pub fn to_u64(value: U256) -> u64 {
    value.saturating_to::<u64>()
}

/// Parse an account address the way wallet tooling does: an optional `0x`
/// prefix followed by 40 hex digits. All-lowercase and all-uppercase input is
/// accepted as-is; mixed case must carry a valid EIP-55 checksum.
pub fn parse_address(s: &str) -> Result<Address, DomainError> {
    let trimmed = s.trim();
    let hex_str = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex_str.len() != 40 {
        return Err(DomainError::InvalidAddress(format!(
            "expected 40 hex chars, got {}",
            hex_str.len()
        )));
    }
    if !hex_str.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DomainError::InvalidAddress(format!(
            "non-hex character in '{trimmed}'"
        )));
    }

    let has_lower = hex_str.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_str.chars().any(|c| c.is_ascii_uppercase());
    let prefixed = format!("0x{hex_str}");
    if has_lower && has_upper {
        Address::parse_checksummed(&prefixed, None)
            .map_err(|_| DomainError::InvalidAddress(format!("bad checksum in '{trimmed}'")))
    } else {
        prefixed
            .to_ascii_lowercase()
            .parse::<Address>()
            .map_err(|e| DomainError::InvalidAddress(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x57190DE0E0bF65eF2356a7BFa0bE0A05b0c48827";

    #[test]
    fn test_parse_address_checksummed() {
        let addr = parse_address(CHECKSUMMED).unwrap();
        assert_eq!(addr, crate::constants::DEFAULT_CONTRACT_ADDRESS);
    }

    #[test]
    fn test_parse_address_case_insensitive() {
        let lower = parse_address(&CHECKSUMMED.to_lowercase()).unwrap();
        let upper = parse_address(&format!("0x{}", &CHECKSUMMED[2..].to_uppercase())).unwrap();
        let checksummed = parse_address(CHECKSUMMED).unwrap();
        assert_eq!(lower, checksummed);
        assert_eq!(upper, checksummed);
    }

    #[test]
    fn test_parse_address_without_prefix() {
        let addr = parse_address(&CHECKSUMMED[2..]).unwrap();
        assert_eq!(addr, crate::constants::DEFAULT_CONTRACT_ADDRESS);
    }

    #[test]
    fn test_parse_address_bad_checksum() {
        // Flip the case of one letter in an otherwise valid checksummed address.
        let broken = CHECKSUMMED.replacen("DE0E0b", "dE0E0b", 1);
        assert!(matches!(
            parse_address(&broken),
            Err(DomainError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_parse_address_invalid_length() {
        assert!(parse_address("0xdeadbeef").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn test_parse_address_non_hex() {
        assert!(parse_address("0xzz190de0e0bf65ef2356a7bfa0be0a05b0c48827").is_err());
    }

    #[test]
    fn test_to_u64_saturates() {
        assert_eq!(to_u64(U256::from(42u64)), 42);
        assert_eq!(to_u64(U256::MAX), u64::MAX);
    }
}
