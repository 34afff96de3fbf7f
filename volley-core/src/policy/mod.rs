mod recovery;
mod retry;

pub use recovery::{ErrorPredicate, RecoveryDecision, RecoveryStrategy};
pub use retry::{RetryDecision, RetryPolicy};
