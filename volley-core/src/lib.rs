#![forbid(unsafe_code)]

//! Data model and failure-handling decision logic for volley batch fetches.
//!
//! This crate is pure: no I/O, no async. The runtime that drives fetches
//! lives in `volley-exec`.

pub mod error;
pub mod policy;
pub mod types;

pub use crate::error::{FetchError, FetchErrorKind};
pub use crate::policy::{
    ErrorPredicate, RecoveryDecision, RecoveryStrategy, RetryDecision, RetryPolicy,
};
pub use crate::types::{FetchId, Item};
