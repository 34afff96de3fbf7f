#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Cap on concurrently in-flight pipelines; `None` runs every
    /// identifier at once (the reference behavior).
    pub concurrency: Option<usize>,
    /// Buffer size of the merged output channel.
    pub channel_capacity: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            channel_capacity: 32,
        }
    }
}
