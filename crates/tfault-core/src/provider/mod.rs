//! Minimal model of the errors a database driver hands back, and the
//! classifiers that decide which of them are worth retrying.
//!
//! The classifiers only need a kind tag ([`DbError`]) and, for provider
//! failures, the ordered list of numbered sub-errors ([`SqlError`]).

mod classify;
mod error;

pub use classify::{
    NetworkConnectivityClassifier, SqlTransientClassifier, HOST_NOT_FOUND,
    TRANSIENT_ERROR_NUMBERS,
};
pub use error::{DbError, ProviderError, SqlError};
