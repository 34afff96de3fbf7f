pub mod concurrency;

mod batch;
mod events;
mod metrics;
mod pipeline;
mod result;
mod stream;
mod types;

pub use batch::Orchestrator;
pub use events::{CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink};
pub use metrics::{BatchMetrics, MetricsCollector, MetricsEventSink};
pub use result::{BatchStatus, RunError};
pub use stream::BatchStream;
pub use types::OrchestratorConfig;
