use std::time::Duration;
use thiserror::Error;

/// Rejected policy configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("invalid retry configuration: max_attempts must be at least {min}, got {max_attempts}")]
    InvalidConfiguration { max_attempts: u32, min: u32 },
    #[error("invalid retry configuration: wait interval {wait_interval:?} exceeds {max:?}")]
    WaitIntervalTooLong { wait_interval: Duration, max: Duration },
    #[error("invalid retry configuration: wait interval must be a non-negative, representable number of seconds, got {secs}")]
    InvalidWaitInterval { secs: f64 },
}

/// Decision returned by the retry policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// The failure is not transient; surface it unchanged.
    Abort,
    /// Transient failure with budget left: wait, then try again.
    RetryAfter(Duration),
    /// Transient failure that used up the last attempt.
    Exhausted,
}

/// Constant-interval retry policy.
///
/// The policy is configuration only. Attempt counters and failure history live
/// in each execution call, so one instance can be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    wait_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            wait_interval: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Smallest accepted `max_attempts`.
    pub const MIN_ATTEMPTS: u32 = 2;

    /// Longest accepted wait between attempts.
    pub const MAX_WAIT_INTERVAL: Duration = Duration::from_secs(60 * 60);

    /// Build a policy. `max_attempts` counts transient failures, not invocations.
    pub fn new(max_attempts: u32, wait_interval: Duration) -> Result<Self, PolicyError> {
        if max_attempts < Self::MIN_ATTEMPTS {
            return Err(PolicyError::InvalidConfiguration {
                max_attempts,
                min: Self::MIN_ATTEMPTS,
            });
        }
        if wait_interval > Self::MAX_WAIT_INTERVAL {
            return Err(PolicyError::WaitIntervalTooLong {
                wait_interval,
                max: Self::MAX_WAIT_INTERVAL,
            });
        }
        Ok(Self {
            max_attempts,
            wait_interval,
        })
    }

    /// Profile used around state-changing handlers: 5 attempts, 1s apart.
    pub fn for_commands() -> Self {
        Self {
            max_attempts: 5,
            wait_interval: Duration::from_secs(1),
        }
    }

    /// Profile used around read-only handlers: 6 attempts, 1s apart.
    pub fn for_queries() -> Self {
        Self::default()
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn wait_interval(&self) -> Duration {
        self.wait_interval
    }

    /// Decide what to do after a failure.
    ///
    /// `failed_attempts` is the number of transient failures so far, including
    /// this one (1-based). Non-transient failures never consume budget.
    pub fn decide(&self, failed_attempts: u32, transient: bool) -> RetryDecision {
        if !transient {
            return RetryDecision::Abort;
        }
        if failed_attempts >= self.max_attempts {
            return RetryDecision::Exhausted;
        }
        RetryDecision::RetryAfter(self.wait_interval)
    }
}
