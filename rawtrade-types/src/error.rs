use thiserror::Error;

/// Errors raised while building or decoding domain values.
///
/// These are local checks that run before anything is sent to the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("unknown material category: {0}")]
    UnknownCategory(String),

    #[error("unknown order status: {0}")]
    UnknownOrderStatus(u8),

    #[error("special requirements do not fit in a bytes32 ({len} bytes, max 31)")]
    RequirementsTooLong { len: usize },

    #[error("invalid bytes32 string: {reason}")]
    InvalidBytes32 { reason: String },
}
