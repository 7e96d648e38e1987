//! Classify provider errors as transient, decoding throttling detail on the way.

use super::error::{DbError, ProviderError};
use crate::retry::{Classification, FaultClassifier};
use crate::throttling::{ThrottlingCondition, THROTTLING_ERROR_NUMBER};

/// Server host could not be resolved or reached.
pub const HOST_NOT_FOUND: i32 = 11001;

/// Provider error numbers treated as transient, besides throttling (40501).
///
/// Connection failures (233, 64, 20, 10053, 10054, 10060, 11001), resource
/// governance limits (10928, 10929), and service-side failover or
/// unavailability (40143, 40197, 40540, 40613).
pub const TRANSIENT_ERROR_NUMBERS: [i32; 13] = [
    HOST_NOT_FOUND,
    10928,
    10929,
    10053,
    10054,
    10060,
    40197,
    40540,
    40613,
    40143,
    233,
    64,
    20,
];

/// Transient detection for SQL data access: known transient error numbers,
/// throttling (with reason decoding), and client-side timeouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlTransientClassifier;

impl FaultClassifier<ProviderError> for SqlTransientClassifier {
    fn classify(&self, error: &ProviderError) -> Classification {
        for sub in error.errors() {
            if sub.number == THROTTLING_ERROR_NUMBER {
                return Classification::throttled(ThrottlingCondition::from_sql_error(sub));
            }
            if TRANSIENT_ERROR_NUMBERS.contains(&sub.number) {
                return Classification::retryable();
            }
        }
        Classification::permanent()
    }
}

impl FaultClassifier<DbError> for SqlTransientClassifier {
    fn classify(&self, error: &DbError) -> Classification {
        match error {
            DbError::Provider(p) => self.classify(p),
            DbError::Timeout { .. } => Classification::retryable(),
            DbError::Io(_) | DbError::Other(_) => Classification::permanent(),
        }
    }
}

impl FaultClassifier<anyhow::Error> for SqlTransientClassifier {
    fn classify(&self, error: &anyhow::Error) -> Classification {
        classify_dyn(self, error)
    }
}

/// Only "host not found" (11001) on the primary provider error is transient.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkConnectivityClassifier;

impl FaultClassifier<ProviderError> for NetworkConnectivityClassifier {
    fn classify(&self, error: &ProviderError) -> Classification {
        if error.number() == Some(HOST_NOT_FOUND) {
            Classification::retryable()
        } else {
            Classification::permanent()
        }
    }
}

impl FaultClassifier<DbError> for NetworkConnectivityClassifier {
    fn classify(&self, error: &DbError) -> Classification {
        match error.as_provider() {
            Some(p) => self.classify(p),
            None => Classification::permanent(),
        }
    }
}

impl FaultClassifier<anyhow::Error> for NetworkConnectivityClassifier {
    fn classify(&self, error: &anyhow::Error) -> Classification {
        classify_dyn(self, error)
    }
}

/// Look for a [`DbError`] or bare [`ProviderError`] inside an `anyhow::Error`.
fn classify_dyn<C>(classifier: &C, error: &anyhow::Error) -> Classification
where
    C: FaultClassifier<DbError> + FaultClassifier<ProviderError>,
{
    if let Some(db) = error.downcast_ref::<DbError>() {
        return FaultClassifier::<DbError>::classify(classifier, db);
    }
    if let Some(p) = error.downcast_ref::<ProviderError>() {
        return FaultClassifier::<ProviderError>::classify(classifier, p);
    }
    Classification::permanent()
}
