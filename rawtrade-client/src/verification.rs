use std::fmt;

use serde::Serialize;

/// Result of a verified-supplier / verified-buyer lookup.
///
/// A failed lookup is reported as `CheckFailed` instead of being folded into
/// `Unverified`, so callers can tell "not verified" from "could not ask".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Verification {
    Verified,
    Unverified,
    CheckFailed(String),
}

impl Verification {
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            Verification::Verified
        } else {
            Verification::Unverified
        }
    }

    /// `true` only for a successful lookup that returned `true`. A failed
    /// lookup reads as `false` here.
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified)
    }

    pub fn is_check_failed(&self) -> bool {
        matches!(self, Verification::CheckFailed(_))
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verification::Verified => f.write_str("verified"),
            Verification::Unverified => f.write_str("not verified"),
            Verification::CheckFailed(reason) => write!(f, "check failed ({reason})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_failed_is_distinguishable() {
        let unverified = Verification::from_flag(false);
        let failed = Verification::CheckFailed("timeout".to_string());
        assert!(!unverified.is_verified());
        assert!(!failed.is_verified());
        assert_ne!(unverified, failed);
        assert!(failed.is_check_failed());
        assert!(!unverified.is_check_failed());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(Verification::CheckFailed("boom".to_string())).unwrap();
        assert_eq!(json["status"], "check_failed");
        assert_eq!(json["reason"], "boom");
        let json = serde_json::to_value(Verification::Verified).unwrap();
        assert_eq!(json["status"], "verified");
    }
}
