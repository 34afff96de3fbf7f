use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Optional cap on concurrently in-flight fetch pipelines.
///
/// With no cap every identifier runs at once; with `Some(n)` at most `n`
/// pipelines hold a permit at a time. The permit is held for the whole
/// lifetime of one identifier's pipeline, delays included.
#[derive(Clone)]
pub struct FetchLimits {
    cap: Option<Arc<Semaphore>>,
}

impl FetchLimits {
    pub fn new(cap: Option<usize>) -> Self {
        Self {
            cap: cap.map(|n| Arc::new(Semaphore::new(n))),
        }
    }

    pub async fn acquire(&self) -> FetchPermit {
        // Semaphore acquire should never fail unless the semaphore is closed,
        // which should never happen in normal operation. If it does, it's a bug.
        let permit = match &self.cap {
            Some(sem) => Some(sem.clone().acquire_owned().await.unwrap_or_else(|_| {
                panic!("concurrency semaphore closed unexpectedly. This is a bug - please report it.");
            })),
            None => None,
        };
        FetchPermit { _permit: permit }
    }
}

pub struct FetchPermit {
    _permit: Option<OwnedSemaphorePermit>,
}
