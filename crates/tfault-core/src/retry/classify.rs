//! The classification capability consulted by the retry loop.

use crate::throttling::ThrottlingCondition;

/// Outcome of classifying one error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    pub transient: bool,
    /// Set when the error reported server throttling and the reason was decoded.
    pub throttling: Option<ThrottlingCondition>,
}

impl Classification {
    pub fn retryable() -> Self {
        Self {
            transient: true,
            throttling: None,
        }
    }

    pub fn permanent() -> Self {
        Self::default()
    }

    pub fn throttled(condition: ThrottlingCondition) -> Self {
        Self {
            transient: true,
            throttling: Some(condition),
        }
    }
}

/// Decides whether an error is worth retrying.
///
/// Implementations must not panic; anything they cannot interpret is simply
/// not transient.
pub trait FaultClassifier<E: ?Sized> {
    fn classify(&self, error: &E) -> Classification;

    fn is_transient(&self, error: &E) -> bool {
        self.classify(error).transient
    }
}

/// Any `Fn(&E) -> bool` predicate is a classifier without throttling detail.
impl<E: ?Sized, F> FaultClassifier<E> for F
where
    F: Fn(&E) -> bool,
{
    fn classify(&self, error: &E) -> Classification {
        if self(error) {
            Classification::retryable()
        } else {
            Classification::permanent()
        }
    }
}
