use call_concurrency_core::ResultsSubmission;

use crate::error::AdapterError;

pub trait ResultSink {
    /// Deliver the submission and return the receiver's response body.
    fn submit(&self, submission: &ResultsSubmission) -> Result<String, AdapterError>;
}
