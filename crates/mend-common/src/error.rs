//! Error types for the CodeMend gate

use thiserror::Error;

/// Gate error type
///
/// Every variant is terminal for the request that produced it; nothing here
/// is retried internally. The HTTP layer maps variants onto status codes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    /// No credential, invalid credential, or unknown principal
    #[error("authentication required: {0}")]
    Unauthenticated(String),

    /// Principal's tier id does not resolve in the tier catalog
    #[error("invalid subscription tier: {0}")]
    InvalidSubscription(String),

    /// Request counter crossed the tier limit
    #[error("monthly request limit of {limit} reached; upgrade your plan to continue")]
    QuotaExceeded {
        /// The configured limit that was crossed
        limit: i64,
    },

    /// Role check failed on an admin-only route
    #[error("forbidden")]
    Forbidden,

    /// Duplicate registration for an existing contact identifier
    #[error("conflict: {0}")]
    Conflict(String),

    /// Anything unrecoverable upstream of the gate
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for gate operations
pub type GateResult<T> = Result<T, GateError>;
