use std::path::PathBuf;
use std::time::Instant;

use call_concurrency_core::contract::dataset_fingerprint;
use call_concurrency_core::{
    assemble_results_parallel, normalize_calls, partition_calls, summarize, ResultsSubmission,
    RunStatistics,
};
use tracing::{info, warn};

use crate::adapters::call_source::CallSource;
use crate::adapters::result_sink::ResultSink;
use crate::error::ServiceError;
use crate::export::write_submission_json;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Worker threads for the sweep; rayon's default when unset.
    pub threads: Option<usize>,
    /// Also write the submission body to this file.
    pub output: Option<PathBuf>,
    /// Compute (and export) without posting.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub dataset_fingerprint: String,
    pub statistics: RunStatistics,
    pub submitted: bool,
    pub receiver_response: Option<String>,
}

/// Fetch, validate, compute and deliver one batch of call records.
pub fn handle_run(
    options: &RunOptions,
    source: &impl CallSource,
    sink: &impl ResultSink,
) -> Result<RunReport, ServiceError> {
    let started_at = Instant::now();
    info!(
        event = "run_started",
        threads = ?options.threads,
        dry_run = options.dry_run,
        "starting concurrency run"
    );

    let calls = source.fetch_calls().map_err(ServiceError::Fetch)?;
    let calls = normalize_calls(calls).inspect_err(|error| {
        warn!(event = "dataset_rejected", %error, "call records failed validation");
    })?;
    let fingerprint = dataset_fingerprint(&calls);
    info!(
        event = "dataset_fetched",
        calls = calls.len(),
        fingerprint = %fingerprint,
        "call records fetched"
    );

    let buckets = partition_calls(&calls);
    let results = assemble_results_parallel(&buckets, options.threads)?;
    let statistics = summarize(calls.len(), buckets.len(), &results);
    info!(
        event = "results_computed",
        buckets = statistics.bucket_count,
        results = statistics.result_count,
        peak = statistics
            .busiest
            .as_ref()
            .map(|result| result.max_concurrent_calls)
            .unwrap_or(0),
        duration_ms = started_at.elapsed().as_millis() as u64,
        "peak concurrency computed"
    );

    let submission = ResultsSubmission::from(results);
    if let Some(path) = &options.output {
        write_submission_json(&submission, path)?;
        info!(event = "results_exported", path = %path.display(), "submission written");
    }

    if options.dry_run {
        info!(event = "submission_skipped", "dry run, results not posted");
        return Ok(RunReport {
            dataset_fingerprint: fingerprint,
            statistics,
            submitted: false,
            receiver_response: None,
        });
    }

    let response = sink.submit(&submission).map_err(ServiceError::Submit)?;
    info!(
        event = "results_submitted",
        results = submission.results.len(),
        duration_ms = started_at.elapsed().as_millis() as u64,
        "results posted"
    );

    Ok(RunReport {
        dataset_fingerprint: fingerprint,
        statistics,
        submitted: true,
        receiver_response: Some(response),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use call_concurrency_core::Call;

    use super::*;
    use crate::error::AdapterError;

    const JAN_1_2024_MS: i64 = 1_704_067_200_000;

    struct StaticSource {
        calls: Vec<Call>,
    }

    impl CallSource for StaticSource {
        fn fetch_calls(&self) -> Result<Vec<Call>, AdapterError> {
            Ok(self.calls.clone())
        }
    }

    struct FailingSource;

    impl CallSource for FailingSource {
        fn fetch_calls(&self) -> Result<Vec<Call>, AdapterError> {
            Err(AdapterError::Status {
                status: 503,
                reason: "Service Unavailable".to_string(),
            })
        }
    }

    struct CapturingSink {
        submissions: Mutex<Vec<ResultsSubmission>>,
        reject: bool,
    }

    impl CapturingSink {
        fn new() -> Self {
            Self {
                submissions: Mutex::new(Vec::new()),
                reject: false,
            }
        }

        fn rejecting() -> Self {
            Self {
                reject: true,
                ..Self::new()
            }
        }

        fn submissions(&self) -> Vec<ResultsSubmission> {
            self.submissions.lock().expect("poisoned mutex").clone()
        }
    }

    impl ResultSink for CapturingSink {
        fn submit(&self, submission: &ResultsSubmission) -> Result<String, AdapterError> {
            self.submissions
                .lock()
                .expect("poisoned mutex")
                .push(submission.clone());
            if self.reject {
                return Err(AdapterError::Status {
                    status: 400,
                    reason: "Bad Request".to_string(),
                });
            }
            Ok("{\"accepted\":true}".to_string())
        }
    }

    fn sample_source() -> StaticSource {
        StaticSource {
            calls: vec![
                Call::new(1, "A", JAN_1_2024_MS + 1_000, JAN_1_2024_MS + 5_000),
                Call::new(1, "B", JAN_1_2024_MS + 2_000, JAN_1_2024_MS + 6_000),
                Call::new(2, "C", JAN_1_2024_MS + 1_000, JAN_1_2024_MS + 2_000),
            ],
        }
    }

    #[test]
    fn posts_computed_results_once() {
        let sink = CapturingSink::new();
        let report =
            handle_run(&RunOptions::default(), &sample_source(), &sink).expect("run should pass");

        assert!(report.submitted);
        assert_eq!(report.receiver_response.as_deref(), Some("{\"accepted\":true}"));
        assert_eq!(report.statistics.result_count, 2);
        assert_eq!(report.dataset_fingerprint.len(), 64);

        let submissions = sink.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].results[0].max_concurrent_calls, 2);
        assert_eq!(submissions[0].results[0].call_ids, vec!["A", "B"]);
        assert_eq!(submissions[0].results[1].customer_id, 2);
    }

    #[test]
    fn statistics_count_buckets_from_the_computed_partition() {
        let day_ms = 86_400_000;
        let source = StaticSource {
            calls: vec![
                Call::new(
                    1,
                    "overnight",
                    JAN_1_2024_MS + day_ms - 1_000,
                    JAN_1_2024_MS + day_ms + 1_000,
                ),
                Call::new(2, "edge", JAN_1_2024_MS + 10, JAN_1_2024_MS + day_ms),
            ],
        };
        let options = RunOptions {
            dry_run: true,
            ..RunOptions::default()
        };

        let report =
            handle_run(&options, &source, &CapturingSink::new()).expect("run should pass");

        assert_eq!(report.statistics.total_calls, 2);
        // "edge" lands in a Jan 2 bucket it only touches, which yields no result.
        assert_eq!(report.statistics.bucket_count, 4);
        assert_eq!(report.statistics.result_count, 3);
    }

    #[test]
    fn dry_run_skips_submission() {
        let sink = CapturingSink::new();
        let options = RunOptions {
            dry_run: true,
            ..RunOptions::default()
        };

        let report = handle_run(&options, &sample_source(), &sink).expect("run should pass");
        assert!(!report.submitted);
        assert!(sink.submissions().is_empty());
    }

    #[test]
    fn invalid_calls_abort_before_submission() {
        let sink = CapturingSink::new();
        let source = StaticSource {
            calls: vec![Call::new(1, "backwards", 10, 5)],
        };

        let error =
            handle_run(&RunOptions::default(), &source, &sink).expect_err("run should fail");
        assert!(matches!(error, ServiceError::Validation(_)));
        assert!(sink.submissions().is_empty());
    }

    #[test]
    fn fetch_failure_is_fatal() {
        let sink = CapturingSink::new();
        let error =
            handle_run(&RunOptions::default(), &FailingSource, &sink).expect_err("run should fail");

        assert!(matches!(error, ServiceError::Fetch(AdapterError::Status { status: 503, .. })));
        assert!(sink.submissions().is_empty());
    }

    #[test]
    fn rejected_submission_is_reported() {
        let sink = CapturingSink::rejecting();
        let error = handle_run(&RunOptions::default(), &sample_source(), &sink)
            .expect_err("run should fail");

        assert!(matches!(error, ServiceError::Submit(_)));
        assert_eq!(sink.submissions().len(), 1);
    }

    #[test]
    fn exports_submission_when_output_is_set() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("results.json");
        let options = RunOptions {
            output: Some(path.clone()),
            dry_run: true,
            ..RunOptions::default()
        };

        handle_run(&options, &sample_source(), &CapturingSink::new()).expect("run should pass");

        let text = std::fs::read_to_string(&path).expect("export should exist");
        let parsed: ResultsSubmission = serde_json::from_str(&text).expect("export should parse");
        assert_eq!(parsed.results.len(), 2);
    }
}
