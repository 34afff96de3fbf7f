use std::time::Duration;

use crate::error::FetchError;

/// What the orchestrator should do with a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    RetryNow,
    RetryAfter(Duration),
    GiveUp,
}

/// When (and whether) to re-attempt a failed fetch.
///
/// A policy is a pure function of the 1-based attempt number and the
/// failure; the orchestrator threads the attempt counter through, and the
/// RNG for jitter is injected by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Never retry; the first failure goes straight to recovery.
    None,
    /// Retry until success. Only safe under an outer timeout.
    Unbounded,
    /// Up to `max_retries` immediate re-attempts.
    MaxAttempts { max_retries: u32 },
    /// Up to `max_retries` re-attempts, each after a fixed delay.
    FixedDelay { max_retries: u32, delay: Duration },
    /// Up to `max_retries` re-attempts with doubling delay starting at
    /// `base`, optionally with full jitter.
    ExponentialBackoff {
        max_retries: u32,
        base: Duration,
        jitter: bool,
    },
}

impl RetryPolicy {
    /// Decide whether to retry after attempt `attempt_no` failed.
    ///
    /// `rand_u64` is consulted only when jitter is enabled; jittered delays
    /// are uniform in `0..=raw_delay`.
    pub fn decide(
        &self,
        attempt_no: u32,
        _failure: &FetchError,
        rand_u64: impl Fn() -> u64,
    ) -> RetryDecision {
        match self {
            RetryPolicy::None => RetryDecision::GiveUp,
            RetryPolicy::Unbounded => RetryDecision::RetryNow,
            RetryPolicy::MaxAttempts { max_retries } => {
                if attempt_no <= *max_retries {
                    RetryDecision::RetryNow
                } else {
                    RetryDecision::GiveUp
                }
            }
            RetryPolicy::FixedDelay { max_retries, delay } => {
                if attempt_no <= *max_retries {
                    RetryDecision::RetryAfter(*delay)
                } else {
                    RetryDecision::GiveUp
                }
            }
            RetryPolicy::ExponentialBackoff {
                max_retries,
                base,
                jitter,
            } => {
                if attempt_no > *max_retries {
                    return RetryDecision::GiveUp;
                }
                let exp = attempt_no.saturating_sub(1).min(63);
                let raw_ms = (base.as_millis() as u64).saturating_mul(1u64 << exp);
                let delay_ms = if *jitter && raw_ms > 0 {
                    rand_u64() % (raw_ms + 1)
                } else {
                    raw_ms
                };
                RetryDecision::RetryAfter(Duration::from_millis(delay_ms))
            }
        }
    }
}
