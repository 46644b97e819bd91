use eventcally_rfc::error::RfcError;
use thiserror::Error;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    CoreError(#[from] eventcally_core::error::CoreError),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRecurrenceRule(String),

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),

    #[error("Materialization would leave the event without occurrences")]
    EmptyOccurrenceSet,
}

impl From<RfcError> for ServiceError {
    fn from(err: RfcError) -> Self {
        match err {
            RfcError::InvalidRecurrenceRule(message) => Self::InvalidRecurrenceRule(message),
            RfcError::UnknownTimezone(tzid) => {
                Self::InvalidRecurrenceRule(format!("unknown timezone {tzid}"))
            }
        }
    }
}

impl ServiceError {
    /// True for failures caused by the caller's input rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRecurrenceRule(_) | Self::InvalidDateFormat(_) | Self::ValidationError(_)
        )
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
