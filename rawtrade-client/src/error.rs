use rawtrade_types::DomainError;
use thiserror::Error;

/// Why a single remote call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallFailure {
    /// The endpoint could not be reached or answered with a non-revert error.
    #[error("transport error: {0}")]
    Transport(String),

    /// The contract rejected the call, or the mined transaction failed.
    #[error("execution reverted: {0}")]
    Reverted(String),

    /// The identifier does not resolve to a record on the contract.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response could not be decoded against the ABI.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The transaction could not be signed locally.
    #[error("signing failed: {0}")]
    Signer(String),
}

/// A failed contract operation, keeping the operation name and the original
/// message of the underlying failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {cause}")]
pub struct RemoteCallError {
    pub operation: &'static str,
    pub cause: CallFailure,
}

impl RemoteCallError {
    pub fn new(operation: &'static str, cause: CallFailure) -> Self {
        Self { operation, cause }
    }

    pub fn is_revert(&self) -> bool {
        matches!(self.cause, CallFailure::Reverted(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self.cause, CallFailure::Transport(_))
    }
}

/// Errors returned by the adapter and the session.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid input: {0}")]
    Validation(#[from] DomainError),

    #[error("no wallet connected")]
    NotConnected,

    #[error("wrong network: expected chain {expected}, endpoint is on chain {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("{0} is already waiting for confirmation")]
    AlreadyInFlight(String),

    #[error("connection was replaced while {operation} was in flight; result discarded")]
    ConnectionReplaced { operation: &'static str },

    #[error(transparent)]
    Remote(#[from] RemoteCallError),
}

impl ClientError {
    /// The remote failure behind this error, if any.
    pub fn remote(&self) -> Option<&RemoteCallError> {
        match self {
            ClientError::Remote(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_keeps_original_message() {
        let err = RemoteCallError::new(
            "listMaterial",
            CallFailure::Reverted("Not a verified supplier".to_string()),
        );
        let msg = err.to_string();
        assert!(msg.contains("listMaterial"));
        assert!(msg.contains("Not a verified supplier"));
        assert!(err.is_revert());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_client_error_is_transparent_for_remote() {
        let remote = RemoteCallError::new(
            "getOrderInfo",
            CallFailure::Transport("connection refused".to_string()),
        );
        let err: ClientError = remote.clone().into();
        assert_eq!(err.to_string(), remote.to_string());
        assert_eq!(err.remote(), Some(&remote));
    }

    #[test]
    fn test_validation_from_domain_error() {
        let err: ClientError = DomainError::MissingField("quality grade").into();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(err.to_string().contains("quality grade is required"));
    }
}
