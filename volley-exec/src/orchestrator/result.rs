use volley_core::{FetchError, FetchId};

/// Terminal state of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every identifier reached Succeeded or Dropped.
    Completed,
    /// One recovery decision propagated its failure.
    Failed,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Completed => "completed",
            BatchStatus::Failed => "failed",
        }
    }
}

/// The failure that ended a batch after recovery chose to propagate it.
///
/// Wraps the last per-attempt failure of the identifier that terminated the
/// run, i.e. the failure left over once its retries were exhausted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("batch failed at {id}: {source}")]
pub struct RunError {
    pub id: FetchId,
    #[source]
    pub source: FetchError,
}
