use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use volley_core::{FetchError, FetchId, Item, RecoveryStrategy, RetryPolicy};

use crate::fetcher::Fetcher;
use crate::orchestrator::concurrency::FetchLimits;
use crate::orchestrator::events::{Event, EventSink};
use crate::orchestrator::pipeline::{run_pipeline, PipelineDeps, PipelineOutcome};
use crate::orchestrator::result::{BatchStatus, RunError};
use crate::orchestrator::stream::BatchStream;
use crate::orchestrator::types::OrchestratorConfig;

/// Drives one batch of identifiers through fetch, retry, and recovery, and
/// merges the outcomes into a single output stream.
pub struct Orchestrator {
    config: OrchestratorConfig,
    fetcher: Arc<dyn Fetcher>,
    retry: RetryPolicy,
    recovery: RecoveryStrategy,
    event_sink: Arc<dyn EventSink>,
}

impl Orchestrator {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        retry: RetryPolicy,
        recovery: RecoveryStrategy,
        config: OrchestratorConfig,
        event_sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            fetcher,
            retry,
            recovery,
            event_sink,
        }
    }

    /// Start one pipeline per identifier and return the merged stream.
    ///
    /// Results arrive in resolution order, not submission order.
    pub async fn run(&self, ids: Vec<FetchId>) -> BatchStream {
        let run_id = Uuid::new_v4();
        let (out_tx, out_rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let (res_tx, res_rx) = mpsc::channel(ids.len().max(1));
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let cancel_tx = Arc::new(cancel_tx);
        let limits = FetchLimits::new(self.config.concurrency);

        self.event_sink
            .emit(Event::BatchStarted {
                run_id,
                total: ids.len(),
            })
            .await;

        for id in ids {
            let deps = PipelineDeps {
                run_id,
                fetcher: self.fetcher.clone(),
                retry: self.retry.clone(),
                recovery: self.recovery.clone(),
                event_sink: self.event_sink.clone(),
            };
            let mut cancel = cancel_rx.clone();
            let cancel_tx = cancel_tx.clone();
            let res_tx = res_tx.clone();
            let limits = limits.clone();
            tokio::spawn(async move {
                // The permit is held until after the outcome is reported so
                // queued pipelines never start into a freshly failed run.
                let _permit = limits.acquire().await;
                if let Some(outcome) = run_pipeline(&deps, &id, &mut cancel).await {
                    if matches!(outcome, PipelineOutcome::Propagated(_)) {
                        let _ = cancel_tx.send(true);
                    }
                    let _ = res_tx.send((id, outcome)).await;
                }
            });
        }
        drop(res_tx);

        let event_sink = self.event_sink.clone();
        tokio::spawn(merge_outcomes(run_id, res_rx, out_tx, cancel_tx, event_sink));

        BatchStream::new(out_rx)
    }

    /// Run the batch to completion and collect every emitted item.
    pub async fn collect(&self, ids: Vec<FetchId>) -> Result<Vec<Item>, RunError> {
        let mut stream = self.run(ids).await;
        let mut items = Vec::new();
        while let Some(next) = stream.next_event().await {
            items.push(next?);
        }
        Ok(items)
    }

    /// Bulk entry point: one fetch for the whole collection, no fan-out.
    pub async fn fetch_all(&self) -> Result<Vec<Item>, FetchError> {
        self.fetcher.fetch_all().await
    }
}

/// Sole writer to the merged output channel.
///
/// Forwards resolved items in arrival order. The first propagated failure
/// flips the cancel flag, emits exactly one terminal error, and stops
/// reading; later pipeline results are discarded with the result channel.
/// A caller abandoning the stream cancels the run the same way, even while
/// every remaining pipeline is dropping results or sleeping out a retry.
async fn merge_outcomes(
    run_id: Uuid,
    mut res_rx: mpsc::Receiver<(FetchId, PipelineOutcome)>,
    out_tx: mpsc::Sender<Result<Item, RunError>>,
    cancel_tx: Arc<watch::Sender<bool>>,
    event_sink: Arc<dyn EventSink>,
) {
    loop {
        let next = tokio::select! {
            next = res_rx.recv() => next,
            _ = out_tx.closed() => {
                let _ = cancel_tx.send(true);
                return;
            }
        };
        let Some((id, outcome)) = next else {
            break;
        };
        match outcome {
            PipelineOutcome::Fetched(item) | PipelineOutcome::Substituted(item) => {
                if out_tx.send(Ok(item)).await.is_err() {
                    // Caller dropped the stream; cancel the rest of the run.
                    let _ = cancel_tx.send(true);
                    return;
                }
            }
            PipelineOutcome::Dropped => {}
            PipelineOutcome::Propagated(failure) => {
                let _ = cancel_tx.send(true);
                event_sink
                    .emit(Event::BatchFinished {
                        run_id,
                        status: BatchStatus::Failed,
                    })
                    .await;
                let _ = out_tx.send(Err(RunError { id, source: failure })).await;
                return;
            }
        }
    }
    event_sink
        .emit(Event::BatchFinished {
            run_id,
            status: BatchStatus::Completed,
        })
        .await;
}
