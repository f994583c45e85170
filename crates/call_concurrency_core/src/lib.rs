//! Per-customer, per-day peak call concurrency.
//!
//! This crate owns the deterministic computation and the request/response
//! contracts exchanged with the call dataset API. It intentionally excludes
//! HTTP, configuration and process concerns; those live in
//! `call_concurrency_service`.
//!
//! The pipeline has three stages:
//!
//! - [`bucketing`]: group calls by `(customer_id, day)`, a call landing in every
//!   UTC day it touches
//! - [`sweep`]: sort start/end events and track the active call set to find
//!   the first moment the bucket reaches its maximum concurrency
//! - [`assembly`]: collect one [`ConcurrencyResult`] per non-empty bucket
//!
//! ```
//! use call_concurrency_core::{compute_concurrency_results, Call};
//!
//! let calls = vec![
//!     Call::new(1, "a", 1_000, 5_000),
//!     Call::new(1, "b", 2_000, 6_000),
//! ];
//! let results = compute_concurrency_results(&calls);
//! assert_eq!(results[0].max_concurrent_calls, 2);
//! assert_eq!(results[0].timestamp, 2_000);
//! ```

pub mod assembly;
pub mod bucketing;
pub mod contract;
pub mod day;
pub mod sweep;

pub use assembly::{
    assemble_results, assemble_results_parallel, compute_concurrency_results,
    compute_concurrency_results_parallel, summarize, RunStatistics,
};
pub use bucketing::{partition_calls, BucketKey};
pub use contract::{
    normalize_calls, Call, CallRecordsResponse, ConcurrencyResult, ResultsSubmission,
    ValidationError,
};
pub use day::{DayKey, DayWindow};
pub use sweep::{peak_for_bucket, Peak};
