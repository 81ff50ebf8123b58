//! Error types for gator.

use thiserror::Error;

/// Common error type for gator.
#[derive(Error, Debug)]
pub enum GatorError {
    /// Wrong number or shape of command arguments.
    #[error("usage: {0}")]
    Usage(String),

    /// No handler is registered under the given name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The aggregation interval could not be parsed.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// Authentication error (no current user, or the user is gone).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Login named a user that was never registered.
    #[error("user {0} is not registered")]
    NotRegistered(String),

    /// Validation error for user input or a store constraint.
    #[error("validation error: {0}")]
    Validation(String),

    /// Database error.
    ///
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// The feed could not be retrieved over the network.
    #[error("network error: {0}")]
    Network(String),

    /// The feed server answered with a non-success status.
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    /// The response body is not a feed we can parse.
    #[error("feed parse error: {0}")]
    FeedParse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or session file error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GatorError {
    /// Whether this error came from fetching a feed rather than from
    /// the store or the caller.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            GatorError::Network(_) | GatorError::HttpStatus(_) | GatorError::FeedParse(_)
        )
    }
}

// Conversion from sqlx errors
impl From<sqlx::Error> for GatorError {
    fn from(e: sqlx::Error) -> Self {
        GatorError::Database(e.to_string())
    }
}

/// Result type alias for gator operations.
pub type Result<T> = std::result::Result<T, GatorError>;
