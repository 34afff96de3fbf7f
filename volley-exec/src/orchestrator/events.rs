use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use volley_core::FetchId;

use crate::orchestrator::result::BatchStatus;

#[derive(Debug, Clone)]
pub enum Event {
    BatchStarted {
        run_id: Uuid,
        total: usize,
    },
    AttemptStarted {
        run_id: Uuid,
        id: FetchId,
        attempt_no: u32,
    },
    AttemptFailed {
        run_id: Uuid,
        id: FetchId,
        attempt_no: u32,
        error: String,
    },
    RetryScheduled {
        run_id: Uuid,
        id: FetchId,
        attempt_no: u32,
        delay_ms: u64,
    },
    ItemFetched {
        run_id: Uuid,
        id: FetchId,
        attempt_no: u32,
    },
    ItemSubstituted {
        run_id: Uuid,
        id: FetchId,
    },
    ItemDropped {
        run_id: Uuid,
        id: FetchId,
    },
    BatchFinished {
        run_id: Uuid,
        status: BatchStatus,
    },
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}

pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            let event_clone = event.clone();
            sink.emit(event_clone).await;
        }
    }
}

/// One JSON object per line on stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        let json = match event {
            Event::BatchStarted { run_id, total } => {
                json!({ "type": "batch.started", "run_id": run_id.to_string(), "total": total })
            }
            Event::AttemptStarted { run_id, id, attempt_no } => {
                json!({ "type": "attempt.started", "run_id": run_id.to_string(), "id": id.to_string(), "attempt_no": attempt_no })
            }
            Event::AttemptFailed { run_id, id, attempt_no, error } => {
                json!({ "type": "attempt.failed", "run_id": run_id.to_string(), "id": id.to_string(), "attempt_no": attempt_no, "error": error })
            }
            Event::RetryScheduled { run_id, id, attempt_no, delay_ms } => {
                json!({ "type": "retry.scheduled", "run_id": run_id.to_string(), "id": id.to_string(), "attempt_no": attempt_no, "delay_ms": delay_ms })
            }
            Event::ItemFetched { run_id, id, attempt_no } => {
                json!({ "type": "item.fetched", "run_id": run_id.to_string(), "id": id.to_string(), "attempt_no": attempt_no })
            }
            Event::ItemSubstituted { run_id, id } => {
                json!({ "type": "item.substituted", "run_id": run_id.to_string(), "id": id.to_string() })
            }
            Event::ItemDropped { run_id, id } => {
                json!({ "type": "item.dropped", "run_id": run_id.to_string(), "id": id.to_string() })
            }
            Event::BatchFinished { run_id, status } => {
                json!({ "type": "batch.finished", "run_id": run_id.to_string(), "status": status.as_str() })
            }
        };
        println!("{}", serde_json::to_string(&json).unwrap_or_default());
    }
}
