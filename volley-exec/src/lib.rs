#![forbid(unsafe_code)]

//! Concurrent fan-out fetch runtime.
//!
//! One asynchronous lookup is issued per identifier; per-item failures run
//! through a retry policy and a recovery strategy before the outcomes are
//! merged into a single arrival-ordered stream. The data model and the
//! decision logic live in `volley-core`.

pub mod fetcher;
pub mod orchestrator;

pub use crate::fetcher::{Fetcher, HttpFetcher, HttpFetcherConfig};
pub use crate::orchestrator::Orchestrator;
