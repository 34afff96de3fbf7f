use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;

use volley_core::Item;

use crate::orchestrator::result::RunError;

/// Merged output of one batch run.
///
/// Yields fetched or substituted items in arrival order, then either ends
/// (run completed) or yields exactly one error and ends (run failed).
/// Dropping the stream early cancels the rest of the run.
pub struct BatchStream {
    rx: mpsc::Receiver<Result<Item, RunError>>,
}

impl BatchStream {
    pub(crate) fn new(rx: mpsc::Receiver<Result<Item, RunError>>) -> Self {
        Self { rx }
    }

    /// Receive the next event; `None` once the run is over.
    pub async fn next_event(&mut self) -> Option<Result<Item, RunError>> {
        self.rx.recv().await
    }
}

impl Stream for BatchStream {
    type Item = Result<Item, RunError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
