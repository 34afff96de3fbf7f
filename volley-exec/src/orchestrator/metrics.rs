use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::orchestrator::events::{Event, EventSink};
use crate::orchestrator::result::BatchStatus;

#[derive(Debug, Clone, Default)]
pub struct BatchMetrics {
    pub run_id: Uuid,
    pub status: String,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    pub total_duration: Option<Duration>,
    pub attempts: usize,
    pub fetch_errors: usize,
    pub items_fetched: usize,
    pub items_substituted: usize,
    pub items_dropped: usize,
    pub retries_scheduled: usize,
}

impl BatchMetrics {
    pub fn start(&mut self, run_id: Uuid) {
        self.run_id = run_id;
        self.started_at = Some(Instant::now());
    }

    pub fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    pub fn record_fetch_error(&mut self) {
        self.fetch_errors += 1;
    }

    pub fn record_fetched(&mut self) {
        self.items_fetched += 1;
    }

    pub fn record_substituted(&mut self) {
        self.items_substituted += 1;
    }

    pub fn record_dropped(&mut self) {
        self.items_dropped += 1;
    }

    pub fn record_retry(&mut self) {
        self.retries_scheduled += 1;
    }

    pub fn finish(&mut self, status: BatchStatus) {
        self.status = status.as_str().to_string();
        self.finished_at = Some(Instant::now());
        if let (Some(started), Some(finished)) = (self.started_at, self.finished_at) {
            self.total_duration = Some(finished.duration_since(started));
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "run_id": self.run_id.to_string(),
            "status": self.status,
            "duration_ms": self.total_duration.map(|d| d.as_millis() as u64),
            "attempts": self.attempts,
            "fetch_errors": self.fetch_errors,
            "items": {
                "fetched": self.items_fetched,
                "substituted": self.items_substituted,
                "dropped": self.items_dropped,
            },
            "retries_scheduled": self.retries_scheduled,
        })
    }
}

pub struct MetricsCollector {
    metrics: Arc<Mutex<BatchMetrics>>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(Mutex::new(BatchMetrics::default())),
        }
    }

    pub async fn snapshot(&self) -> BatchMetrics {
        self.metrics.lock().await.clone()
    }
}

/// Event sink that keeps a `MetricsCollector` up to date and forwards every
/// event to a base sink.
pub struct MetricsEventSink {
    collector: Arc<MetricsCollector>,
    base: Arc<dyn EventSink>,
}

impl MetricsEventSink {
    pub fn new(collector: Arc<MetricsCollector>, base: Arc<dyn EventSink>) -> Self {
        Self { collector, base }
    }
}

#[async_trait]
impl EventSink for MetricsEventSink {
    async fn emit(&self, event: Event) {
        {
            let mut metrics = self.collector.metrics.lock().await;
            match &event {
                Event::BatchStarted { run_id, .. } => metrics.start(*run_id),
                Event::AttemptStarted { .. } => metrics.record_attempt(),
                Event::AttemptFailed { .. } => metrics.record_fetch_error(),
                Event::RetryScheduled { .. } => metrics.record_retry(),
                Event::ItemFetched { .. } => metrics.record_fetched(),
                Event::ItemSubstituted { .. } => metrics.record_substituted(),
                Event::ItemDropped { .. } => metrics.record_dropped(),
                Event::BatchFinished { status, .. } => metrics.finish(*status),
            }
        }

        self.base.emit(event).await;
    }
}
