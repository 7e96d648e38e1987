//! Retry loop: run an operation until it succeeds, fails permanently, or the budget is spent.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::classify::{Classification, FaultClassifier};
use super::error::{FailedAttempt, RetryError, RetryExhausted};
use super::policy::{RetryDecision, RetryPolicy};

/// Granularity at which an abort token is checked during the inter-attempt wait.
const ABORT_POLL_INTERVAL: Duration = Duration::from_millis(50);

impl RetryPolicy {
    /// Run `op` until it succeeds, returning nothing.
    pub fn execute_action<E, F, C>(&self, op: F, classifier: &C) -> Result<(), RetryError<E>>
    where
        E: fmt::Display,
        F: FnMut() -> Result<(), E>,
        C: FaultClassifier<E> + ?Sized,
    {
        run(self, op, classifier, None)
    }

    /// Run `op` until it succeeds and return the value it produced.
    pub fn execute_function<T, E, F, C>(&self, op: F, classifier: &C) -> Result<T, RetryError<E>>
    where
        E: fmt::Display,
        F: FnMut() -> Result<T, E>,
        C: FaultClassifier<E> + ?Sized,
    {
        run(self, op, classifier, None)
    }

    /// Like [`RetryPolicy::execute_action`], but stops with [`RetryError::Aborted`]
    /// once `abort` is set. An attempt already running is not interrupted.
    pub fn execute_action_with_abort<E, F, C>(
        &self,
        op: F,
        classifier: &C,
        abort: &AtomicBool,
    ) -> Result<(), RetryError<E>>
    where
        E: fmt::Display,
        F: FnMut() -> Result<(), E>,
        C: FaultClassifier<E> + ?Sized,
    {
        run(self, op, classifier, Some(abort))
    }

    /// Like [`RetryPolicy::execute_function`], but stops with [`RetryError::Aborted`]
    /// once `abort` is set. An attempt already running is not interrupted.
    pub fn execute_function_with_abort<T, E, F, C>(
        &self,
        op: F,
        classifier: &C,
        abort: &AtomicBool,
    ) -> Result<T, RetryError<E>>
    where
        E: fmt::Display,
        F: FnMut() -> Result<T, E>,
        C: FaultClassifier<E> + ?Sized,
    {
        run(self, op, classifier, Some(abort))
    }
}

fn run<T, E, F, C>(
    policy: &RetryPolicy,
    mut op: F,
    classifier: &C,
    abort: Option<&AtomicBool>,
) -> Result<T, RetryError<E>>
where
    E: fmt::Display,
    F: FnMut() -> Result<T, E>,
    C: FaultClassifier<E> + ?Sized,
{
    let mut history: Vec<FailedAttempt<E>> = Vec::new();
    loop {
        if abort_requested(abort) {
            tracing::debug!(failed_attempts = history.len(), "retry aborted");
            return Err(RetryError::Aborted { history });
        }

        let error = match op() {
            Ok(value) => {
                if !history.is_empty() {
                    tracing::debug!(failed_attempts = history.len(), "operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        let Classification {
            transient,
            throttling,
        } = classifier.classify(&error);
        let attempt = history.len() as u32 + 1;
        let decision = policy.decide(attempt, transient);
        if decision == RetryDecision::Abort {
            tracing::debug!(error = %error, "non-transient failure, not retrying");
            return Err(RetryError::NonTransient(error));
        }

        tracing::warn!(
            attempt,
            max_attempts = policy.max_attempts(),
            error = %error,
            "transient failure"
        );
        if let Some(condition) = &throttling {
            tracing::debug!(attempt, %condition, "server throttling");
        }
        history.push(FailedAttempt {
            attempt,
            error,
            throttling,
        });

        match decision {
            RetryDecision::RetryAfter(delay) => {
                if wait(delay, abort) {
                    tracing::debug!(failed_attempts = history.len(), "retry aborted during wait");
                    return Err(RetryError::Aborted { history });
                }
            }
            _ => {
                tracing::error!(
                    max_attempts = policy.max_attempts(),
                    "retry limit exceeded"
                );
                return Err(RetryError::Exhausted(RetryExhausted::new(
                    policy.max_attempts(),
                    history,
                )));
            }
        }
    }
}

fn abort_requested(abort: Option<&AtomicBool>) -> bool {
    abort.is_some_and(|a| a.load(Ordering::Relaxed))
}

/// Block for `delay`. Returns true if the abort token was raised meanwhile.
fn wait(delay: Duration, abort: Option<&AtomicBool>) -> bool {
    let Some(token) = abort else {
        std::thread::sleep(delay);
        return false;
    };
    // No deadline when `delay` cannot be represented as an instant: poll until aborted.
    let deadline = Instant::now().checked_add(delay);
    loop {
        if token.load(Ordering::Relaxed) {
            return true;
        }
        let remaining = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return false;
                }
                deadline - now
            }
            None => ABORT_POLL_INTERVAL,
        };
        std::thread::sleep(remaining.min(ABORT_POLL_INTERVAL));
    }
}

#[cfg(test)]
mod tests;
