//! Bounded, constant-interval retry of fallible operations.
//!
//! A [`RetryPolicy`] re-runs an operation while a [`FaultClassifier`] reports
//! its failures as transient. Permanent failures surface immediately and
//! unchanged; when the attempt budget runs out the caller gets
//! [`RetryError::Exhausted`] with every recorded failure.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{Classification, FaultClassifier};
pub use error::{FailedAttempt, RetryError, RetryExhausted};
pub use policy::{PolicyError, RetryDecision, RetryPolicy};
