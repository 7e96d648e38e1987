//! Terminal failures of a retried operation.

use std::fmt;

use crate::throttling::ThrottlingCondition;

/// One transient failure recorded while retrying.
#[derive(Debug)]
pub struct FailedAttempt<E> {
    /// 1-based index of the failed attempt.
    pub attempt: u32,
    pub error: E,
    /// Decoded server throttling state, when the classifier found one.
    pub throttling: Option<ThrottlingCondition>,
}

/// Every attempt failed transiently and the retry budget is spent.
///
/// This value is the terminal marker of the call; the per-attempt errors stay
/// available, oldest first, through [`RetryExhausted::history`].
#[derive(Debug)]
pub struct RetryExhausted<E> {
    max_attempts: u32,
    history: Vec<FailedAttempt<E>>,
}

impl<E> RetryExhausted<E> {
    pub(crate) fn new(max_attempts: u32, history: Vec<FailedAttempt<E>>) -> Self {
        Self {
            max_attempts,
            history,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn history(&self) -> &[FailedAttempt<E>] {
        &self.history
    }

    pub fn errors(&self) -> impl Iterator<Item = &E> {
        self.history.iter().map(|a| &a.error)
    }

    pub fn last_error(&self) -> Option<&E> {
        self.history.last().map(|a| &a.error)
    }

    pub fn into_history(self) -> Vec<FailedAttempt<E>> {
        self.history
    }
}

impl<E> fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation retry limit '{}' exceeded", self.max_attempts)
    }
}

impl<E> std::error::Error for RetryExhausted<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.last_error().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Why a retried operation did not produce a value.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The classifier judged the failure permanent. Carries the original error.
    NonTransient(E),
    /// All attempts failed transiently.
    Exhausted(RetryExhausted<E>),
    /// The abort token was raised before the next attempt.
    Aborted { history: Vec<FailedAttempt<E>> },
}

impl<E> RetryError<E> {
    pub fn is_non_transient(&self) -> bool {
        matches!(self, RetryError::NonTransient(_))
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted(_))
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, RetryError::Aborted { .. })
    }

    /// Transient failures recorded before the call ended. Empty for `NonTransient`.
    pub fn history(&self) -> &[FailedAttempt<E>] {
        match self {
            RetryError::NonTransient(_) => &[],
            RetryError::Exhausted(x) => x.history(),
            RetryError::Aborted { history } => history,
        }
    }

    /// The original error for `NonTransient`, otherwise the most recent recorded one.
    pub fn into_inner(self) -> Option<E> {
        match self {
            RetryError::NonTransient(e) => Some(e),
            RetryError::Exhausted(x) => x.into_history().pop().map(|a| a.error),
            RetryError::Aborted { mut history } => history.pop().map(|a| a.error),
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::NonTransient(e) => write!(f, "{}", e),
            RetryError::Exhausted(x) => write!(f, "{}", x),
            RetryError::Aborted { history } => {
                write!(f, "operation aborted after {} failed attempt(s)", history.len())
            }
        }
    }
}

impl<E> std::error::Error for RetryError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RetryError::NonTransient(e) => Some(e),
            RetryError::Exhausted(x) => Some(x),
            RetryError::Aborted { history } => history
                .last()
                .map(|a| &a.error as &(dyn std::error::Error + 'static)),
        }
    }
}
