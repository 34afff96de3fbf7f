use std::fmt;
use std::sync::Arc;

use crate::error::{FetchError, FetchErrorKind};
use crate::types::{FetchId, Item};

/// Caller-supplied test on a failure, used by the `*When` strategies.
pub type ErrorPredicate = Arc<dyn Fn(&FetchError) -> bool + Send + Sync>;

/// How to resolve an identifier whose retries are exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryDecision {
    Substitute(Item),
    Drop,
    Propagate,
}

/// Caller-selected handling for fetches that have exhausted their retries.
///
/// A substitution or drop is terminal for its identifier; `Propagate`
/// terminates the whole batch with that failure.
#[derive(Clone)]
pub enum RecoveryStrategy {
    /// Propagate every failure; the first one ends the whole batch.
    FailFast,
    /// Resolve every failure with the same fallback item.
    SubstituteAll { fallback: Item },
    /// Substitute when the predicate matches, otherwise propagate.
    SubstituteWhen {
        predicate: ErrorPredicate,
        fallback: Item,
    },
    /// Substitute failures of the given kind, otherwise propagate.
    SubstituteOnKind {
        kind: FetchErrorKind,
        fallback: Item,
    },
    /// Drop the identifier when the predicate matches, otherwise propagate.
    DropWhen { predicate: ErrorPredicate },
    /// Drop failures of the given kind, otherwise propagate.
    DropOnKind { kind: FetchErrorKind },
}

impl RecoveryStrategy {
    pub fn substitute_when(
        predicate: impl Fn(&FetchError) -> bool + Send + Sync + 'static,
        fallback: Item,
    ) -> Self {
        RecoveryStrategy::SubstituteWhen {
            predicate: Arc::new(predicate),
            fallback,
        }
    }

    pub fn drop_when(predicate: impl Fn(&FetchError) -> bool + Send + Sync + 'static) -> Self {
        RecoveryStrategy::DropWhen {
            predicate: Arc::new(predicate),
        }
    }

    /// Decide how to resolve `id` after `failure` exhausted its retries.
    pub fn decide(&self, _id: &FetchId, failure: &FetchError) -> RecoveryDecision {
        match self {
            RecoveryStrategy::FailFast => RecoveryDecision::Propagate,
            RecoveryStrategy::SubstituteAll { fallback } => {
                RecoveryDecision::Substitute(fallback.clone())
            }
            RecoveryStrategy::SubstituteWhen {
                predicate,
                fallback,
            } => {
                if predicate(failure) {
                    RecoveryDecision::Substitute(fallback.clone())
                } else {
                    RecoveryDecision::Propagate
                }
            }
            RecoveryStrategy::SubstituteOnKind { kind, fallback } => {
                if failure.kind() == *kind {
                    RecoveryDecision::Substitute(fallback.clone())
                } else {
                    RecoveryDecision::Propagate
                }
            }
            RecoveryStrategy::DropWhen { predicate } => {
                if predicate(failure) {
                    RecoveryDecision::Drop
                } else {
                    RecoveryDecision::Propagate
                }
            }
            RecoveryStrategy::DropOnKind { kind } => {
                if failure.kind() == *kind {
                    RecoveryDecision::Drop
                } else {
                    RecoveryDecision::Propagate
                }
            }
        }
    }
}

impl fmt::Debug for RecoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryStrategy::FailFast => f.write_str("FailFast"),
            RecoveryStrategy::SubstituteAll { fallback } => f
                .debug_struct("SubstituteAll")
                .field("fallback", fallback)
                .finish(),
            RecoveryStrategy::SubstituteWhen { fallback, .. } => f
                .debug_struct("SubstituteWhen")
                .field("predicate", &"<fn>")
                .field("fallback", fallback)
                .finish(),
            RecoveryStrategy::SubstituteOnKind { kind, fallback } => f
                .debug_struct("SubstituteOnKind")
                .field("kind", kind)
                .field("fallback", fallback)
                .finish(),
            RecoveryStrategy::DropWhen { .. } => f
                .debug_struct("DropWhen")
                .field("predicate", &"<fn>")
                .finish(),
            RecoveryStrategy::DropOnKind { kind } => {
                f.debug_struct("DropOnKind").field("kind", kind).finish()
            }
        }
    }
}
