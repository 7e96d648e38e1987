use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// One numbered error reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlError {
    pub number: i32,
    pub message: String,
}

impl SqlError {
    pub fn new(number: i32, message: impl Into<String>) -> Self {
        Self {
            number,
            message: message.into(),
        }
    }
}

impl fmt::Display for SqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {}: {}", self.number, self.message)
    }
}

/// Provider failure carrying one or more numbered sub-errors, in server order.
///
/// The first sub-error is the primary one; its number is what drivers report as
/// the error number of the whole failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    errors: Vec<SqlError>,
}

impl ProviderError {
    pub fn new(errors: Vec<SqlError>) -> Self {
        Self { errors }
    }

    /// Provider error with a single sub-error.
    pub fn single(number: i32, message: impl Into<String>) -> Self {
        Self::new(vec![SqlError::new(number, message)])
    }

    pub fn errors(&self) -> &[SqlError] {
        &self.errors
    }

    /// Number of the primary sub-error, if any.
    pub fn number(&self) -> Option<i32> {
        self.errors.first().map(|e| e.number)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.split_first() {
            None => write!(f, "provider error"),
            Some((primary, rest)) if rest.is_empty() => write!(f, "{}", primary),
            Some((primary, rest)) => write!(f, "{} (+{} more)", primary, rest.len()),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Error raised by a data-access operation.
#[derive(Debug, Error)]
pub enum DbError {
    /// Server reported numbered errors.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Operation or connection timed out on the client side.
    #[error("operation timed out")]
    Timeout { after: Option<Duration> },
    /// Socket or file failure below the driver.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// Anything else (constraint violations, bad SQL, ...).
    #[error("{0}")]
    Other(String),
}

impl DbError {
    pub fn provider(number: i32, message: impl Into<String>) -> Self {
        DbError::Provider(ProviderError::single(number, message))
    }

    pub fn as_provider(&self) -> Option<&ProviderError> {
        match self {
            DbError::Provider(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DbError::Timeout { .. })
    }
}
