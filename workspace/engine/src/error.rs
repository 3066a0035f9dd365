use thiserror::Error;

/// Error types for the automation engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A trigger, value, guard or filter expression failed to parse or
    /// evaluate. The owning rule is treated as not fired.
    #[error("Expression error: {0}")]
    Expression(String),

    /// An update-or-create filter matched more than one transaction
    #[error("Ambiguous match: {0}")]
    AmbiguousMatch(String),

    /// A produced value does not fit the target field
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced row no longer exists
    #[error("Not found: {0}")]
    NotFound(String),
}

impl EngineError {
    /// True for failures worth retrying with backoff. Everything else is
    /// a configuration or data problem that a retry cannot fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Database(_))
    }
}

/// Type alias for Result with EngineError
pub type Result<T> = std::result::Result<T, EngineError>;
