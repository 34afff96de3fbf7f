use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use volley_core::{
    FetchError, FetchId, Item, RecoveryDecision, RecoveryStrategy, RetryDecision, RetryPolicy,
};

use crate::fetcher::Fetcher;
use crate::orchestrator::events::{Event, EventSink};

/// Terminal resolution of one identifier's pipeline.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Fetched(Item),
    Substituted(Item),
    Dropped,
    Propagated(FetchError),
}

pub struct PipelineDeps {
    pub run_id: Uuid,
    pub fetcher: Arc<dyn Fetcher>,
    pub retry: RetryPolicy,
    pub recovery: RecoveryStrategy,
    pub event_sink: Arc<dyn EventSink>,
}

/// Drive one identifier from Pending to a terminal state.
///
/// Attempts are strictly sequential: attempt `k + 1` never starts before
/// attempt `k`'s outcome is known. The cancel flag is checked before each
/// attempt, while waiting out a retry delay, and before the outcome is
/// reported; `None` means the run was cancelled underneath us and nothing
/// must be emitted for this identifier.
pub async fn run_pipeline(
    deps: &PipelineDeps,
    id: &FetchId,
    cancel: &mut watch::Receiver<bool>,
) -> Option<PipelineOutcome> {
    let mut attempt_no: u32 = 1;

    loop {
        if *cancel.borrow() {
            return None;
        }

        deps.event_sink
            .emit(Event::AttemptStarted {
                run_id: deps.run_id,
                id: id.clone(),
                attempt_no,
            })
            .await;

        let failure = match deps.fetcher.fetch(id).await {
            Ok(item) => {
                if *cancel.borrow() {
                    return None;
                }
                deps.event_sink
                    .emit(Event::ItemFetched {
                        run_id: deps.run_id,
                        id: id.clone(),
                        attempt_no,
                    })
                    .await;
                return Some(PipelineOutcome::Fetched(item));
            }
            Err(failure) => failure,
        };

        deps.event_sink
            .emit(Event::AttemptFailed {
                run_id: deps.run_id,
                id: id.clone(),
                attempt_no,
                error: failure.to_string(),
            })
            .await;

        match deps.retry.decide(attempt_no, &failure, || fastrand::u64(..)) {
            RetryDecision::RetryNow => {
                attempt_no += 1;
            }
            RetryDecision::RetryAfter(delay) => {
                deps.event_sink
                    .emit(Event::RetryScheduled {
                        run_id: deps.run_id,
                        id: id.clone(),
                        attempt_no,
                        delay_ms: delay.as_millis() as u64,
                    })
                    .await;
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.changed() => {}
                }
                if *cancel.borrow() {
                    return None;
                }
                attempt_no += 1;
            }
            RetryDecision::GiveUp => {
                if *cancel.borrow() {
                    return None;
                }
                return Some(recover(deps, id, failure).await);
            }
        }
    }
}

async fn recover(deps: &PipelineDeps, id: &FetchId, failure: FetchError) -> PipelineOutcome {
    match deps.recovery.decide(id, &failure) {
        RecoveryDecision::Substitute(item) => {
            deps.event_sink
                .emit(Event::ItemSubstituted {
                    run_id: deps.run_id,
                    id: id.clone(),
                })
                .await;
            PipelineOutcome::Substituted(item)
        }
        RecoveryDecision::Drop => {
            deps.event_sink
                .emit(Event::ItemDropped {
                    run_id: deps.run_id,
                    id: id.clone(),
                })
                .await;
            PipelineOutcome::Dropped
        }
        RecoveryDecision::Propagate => PipelineOutcome::Propagated(failure),
    }
}
