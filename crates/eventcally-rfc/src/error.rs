use thiserror::Error;

/// Recurrence text parsing and expansion errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRecurrenceRule(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
