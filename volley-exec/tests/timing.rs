mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use volley_core::{FetchErrorKind, RecoveryStrategy, RetryPolicy};
use volley_exec::orchestrator::{Event, NoOpEventSink, OrchestratorConfig};
use volley_exec::Orchestrator;

use common::{ids, item, transient, RecordingSink, ScriptedFetcher};

#[tokio::test(start_paused = true)]
async fn fixed_delay_waits_the_configured_delay_before_each_retry() {
    let fetcher = ScriptedFetcher::new()
        .fail(2, transient("Mock Exception"))
        .fail(2, transient("Mock Exception"))
        .ok(2, item(2));
    let orch = Orchestrator::new(
        Arc::new(fetcher),
        RetryPolicy::FixedDelay {
            max_retries: 2,
            delay: Duration::from_secs(2),
        },
        RecoveryStrategy::FailFast,
        OrchestratorConfig::default(),
        Arc::new(NoOpEventSink),
    );

    let started = Instant::now();
    let items = orch.collect(ids(&[2])).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(items, vec![item(2)]);
    assert!(elapsed >= Duration::from_secs(4), "two 2s delays, got {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "delays must not stack further, got {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn exponential_backoff_doubles_the_delay_each_retry() {
    let fetcher = ScriptedFetcher::new()
        .fail(2, transient("Mock Exception"))
        .fail(2, transient("Mock Exception"))
        .fail(2, transient("Mock Exception"))
        .ok(2, item(2));
    let sink = Arc::new(RecordingSink::new());
    let orch = Orchestrator::new(
        Arc::new(fetcher),
        RetryPolicy::ExponentialBackoff {
            max_retries: 3,
            base: Duration::from_secs(1),
            jitter: false,
        },
        RecoveryStrategy::FailFast,
        OrchestratorConfig::default(),
        sink.clone(),
    );

    let started = Instant::now();
    let items = orch.collect(ids(&[2])).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(items, vec![item(2)]);
    // 1s + 2s + 4s before attempts 2, 3, and 4.
    assert!(elapsed >= Duration::from_secs(7), "got {elapsed:?}");
    assert!(elapsed < Duration::from_secs(8), "got {elapsed:?}");

    let delays: Vec<u64> = sink
        .events()
        .iter()
        .filter_map(|e| match e {
            Event::RetryScheduled { delay_ms, .. } => Some(*delay_ms),
            _ => None,
        })
        .collect();
    assert_eq!(delays, vec![1000, 2000, 4000]);
}

#[tokio::test(start_paused = true)]
async fn delayed_retries_do_not_block_other_identifiers() {
    let fetcher = ScriptedFetcher::new()
        .ok(1, item(1))
        .fail(2, transient("Mock Exception"))
        .ok(2, item(2));
    let orch = Orchestrator::new(
        Arc::new(fetcher),
        RetryPolicy::FixedDelay {
            max_retries: 1,
            delay: Duration::from_secs(60),
        },
        RecoveryStrategy::FailFast,
        OrchestratorConfig::default(),
        Arc::new(NoOpEventSink),
    );

    let mut stream = orch.run(ids(&[1, 2])).await;
    // Identifier 1 resolves while identifier 2 is still waiting out its delay.
    let first = stream.next_event().await.unwrap().unwrap();
    assert_eq!(first, item(1));
    let second = stream.next_event().await.unwrap().unwrap();
    assert_eq!(second, item(2));
    assert!(stream.next_event().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_stream_cancels_pipelines_sleeping_out_retries() {
    let fetcher = ScriptedFetcher::new()
        .fail(1, transient("Mock Exception"))
        .fail(2, transient("Mock Exception"));
    let sink = Arc::new(RecordingSink::new());
    let orch = Orchestrator::new(
        Arc::new(fetcher),
        RetryPolicy::FixedDelay {
            max_retries: 1,
            delay: Duration::from_secs(2),
        },
        RecoveryStrategy::DropOnKind {
            kind: FetchErrorKind::Transient,
        },
        OrchestratorConfig::default(),
        sink.clone(),
    );

    let stream = orch.run(ids(&[1, 2])).await;
    // Let both first attempts fail and enter their 2s retry sleeps, then
    // walk away from the stream.
    tokio::time::sleep(Duration::from_millis(10)).await;
    drop(stream);
    tokio::time::sleep(Duration::from_secs(10)).await;

    // Every pipeline outcome would have been Dropped, so nothing ever flows
    // through the output channel; abandoning it must still stop the run
    // before the second attempts fire.
    let attempts = sink
        .events()
        .iter()
        .filter(|e| matches!(e, Event::AttemptStarted { .. }))
        .count();
    assert_eq!(attempts, 2, "no attempts once the stream is gone");
    assert!(
        !sink
            .events()
            .iter()
            .any(|e| matches!(e, Event::BatchFinished { .. })),
        "an abandoned run must not report completion"
    );
}

#[tokio::test(start_paused = true)]
async fn propagation_stops_pipelines_still_waiting_on_a_permit() {
    let fetcher = ScriptedFetcher::new()
        .fail(1, transient("Mock Exception"))
        .fail(2, transient("Mock Exception"));
    let sink = Arc::new(RecordingSink::new());
    let orch = Orchestrator::new(
        Arc::new(fetcher),
        RetryPolicy::FixedDelay {
            max_retries: 2,
            delay: Duration::from_secs(100),
        },
        RecoveryStrategy::FailFast,
        OrchestratorConfig {
            concurrency: Some(1),
            ..OrchestratorConfig::default()
        },
        sink.clone(),
    );

    let started = Instant::now();
    let err = orch.collect(ids(&[1, 2])).await.unwrap_err();
    let elapsed = started.elapsed();

    assert_eq!(err.source, transient("Mock Exception"));
    // With one permit, whichever pipeline runs first exhausts its retries
    // (two 100s delays) and propagates; the queued pipeline must observe the
    // cancelled run and never attempt at all.
    assert!(elapsed >= Duration::from_secs(200), "got {elapsed:?}");
    assert!(elapsed < Duration::from_secs(300), "got {elapsed:?}");

    let attempts = sink
        .events()
        .iter()
        .filter(|e| matches!(e, Event::AttemptStarted { .. }))
        .count();
    assert_eq!(attempts, 3, "only the first pipeline ever attempts");
}
