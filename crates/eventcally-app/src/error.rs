use thiserror::Error;

/// Application-level errors (request layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] eventcally_service::error::ServiceError),

    #[error(transparent)]
    CoreError(#[from] eventcally_core::error::CoreError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to encode response: {0}")]
    ResponseEncoding(#[from] serde_json::Error),
}

impl AppError {
    /// True for failures caused by the request content.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        match self {
            Self::ServiceError(err) => err.is_client_error(),
            Self::InvalidRequest(_) => true,
            Self::CoreError(_) | Self::ResponseEncoding(_) => false,
        }
    }

    /// HTTP status the error is reported with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
