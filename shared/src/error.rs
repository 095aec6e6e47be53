use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ValidationError(String),
    // availability conflict, not a system failure; callers can offer other dates
    #[error("{0}")]
    RoomUnavailable(String),
    // the operation may or may not have committed
    #[error("storage operation timed out: {0}")]
    OperationTimeout(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("mail delivery failed: {0}")]
    MailTransportError(String),
    #[error("{0}")]
    ConversionEntityError(String),
    #[error(transparent)]
    SpecificOperationError(sqlx::Error),
    #[error(transparent)]
    TransactionError(sqlx::Error),
    #[error("{0}")]
    NoRowsAffectedError(String),
}

pub type AppResult<T> = Result<T, AppError>;
