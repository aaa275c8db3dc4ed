//! Domain errors for the LogHive collector.

use thiserror::Error;

/// Domain-level errors that can occur in LogHive.
///
/// Variants fall into three families:
/// - validation (`InvalidToken`, `MissingField`, `InvalidValue`): rejected immediately, never retried
/// - data anomalies (`DataAnomaly`): structurally valid input with impossible values
/// - store failures (`StoreUnavailable`, `SerializationError`): propagated to the caller as-is
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field} value: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Data anomaly: {0}")]
    DataAnomaly(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether the error was caused by the caller's input rather than the system.
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken
                | Self::MissingField(_)
                | Self::InvalidValue { .. }
                | Self::DataAnomaly(_)
                | Self::Forbidden(_)
        )
    }

    /// Stable machine-readable code for API responses.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidValue { .. } => "INVALID_VALUE",
            Self::DataAnomaly(_) => "DATA_ANOMALY",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
