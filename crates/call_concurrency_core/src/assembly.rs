//! Result assembly over all buckets, sequential or on a rayon pool.

use rayon::prelude::*;
use tracing::debug;

use crate::bucketing::{partition_calls, BucketKey, CallBuckets};
use crate::contract::{Call, ConcurrencyResult};
use crate::sweep::peak_for_bucket;

/// Aggregate figures for a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStatistics {
    pub total_calls: usize,
    pub bucket_count: usize,
    pub result_count: usize,
    /// Highest concurrency across all results; earliest in result order wins ties.
    pub busiest: Option<ConcurrencyResult>,
}

fn result_for_bucket(key: &BucketKey, calls: &[&Call]) -> Option<ConcurrencyResult> {
    let peak = peak_for_bucket(calls, key.day.window())?;
    Some(ConcurrencyResult {
        customer_id: key.customer_id,
        date: key.day,
        max_concurrent_calls: peak.max_concurrent_calls,
        timestamp: peak.timestamp,
        call_ids: peak.call_ids,
    })
}

/// One result per bucket that had at least one overlapping call, in bucket
/// key order.
pub fn assemble_results(buckets: &CallBuckets<'_>) -> Vec<ConcurrencyResult> {
    buckets
        .iter()
        .filter_map(|(key, calls)| result_for_bucket(key, calls))
        .collect()
}

pub fn compute_concurrency_results(calls: &[Call]) -> Vec<ConcurrencyResult> {
    let buckets = partition_calls(calls);
    debug!(calls = calls.len(), buckets = buckets.len(), "calls partitioned");
    assemble_results(&buckets)
}

/// [`assemble_results`] with buckets swept on a rayon pool; same output and
/// order.
///
/// # Arguments
///
/// * `buckets` - Buckets from [`partition_calls`]
/// * `num_threads` - Optional number of threads to use. If None, uses rayon's default.
///
/// # Errors
///
/// Returns an error only if the thread pool cannot be created.
pub fn assemble_results_parallel(
    buckets: &CallBuckets<'_>,
    num_threads: Option<usize>,
) -> Result<Vec<ConcurrencyResult>, rayon::ThreadPoolBuildError> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    let entries: Vec<(&BucketKey, &Vec<&Call>)> = buckets.iter().collect();
    Ok(pool.install(|| {
        entries
            .par_iter()
            .filter_map(|(key, calls)| result_for_bucket(key, calls))
            .collect()
    }))
}

/// Same output and order as [`compute_concurrency_results`], with buckets
/// swept in parallel.
pub fn compute_concurrency_results_parallel(
    calls: &[Call],
    num_threads: Option<usize>,
) -> Result<Vec<ConcurrencyResult>, rayon::ThreadPoolBuildError> {
    let buckets = partition_calls(calls);
    debug!(calls = calls.len(), buckets = buckets.len(), "calls partitioned");
    assemble_results_parallel(&buckets, num_threads)
}

/// Figures for a run whose calls were partitioned into `bucket_count` buckets.
pub fn summarize(
    total_calls: usize,
    bucket_count: usize,
    results: &[ConcurrencyResult],
) -> RunStatistics {
    let busiest = results.iter().fold(None::<&ConcurrencyResult>, |best, result| {
        match best {
            Some(current) if current.max_concurrent_calls >= result.max_concurrent_calls => {
                Some(current)
            }
            _ => Some(result),
        }
    });

    RunStatistics {
        total_calls,
        bucket_count,
        result_count: results.len(),
        busiest: busiest.cloned(),
    }
}
