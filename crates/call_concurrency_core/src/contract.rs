use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::day::{DayKey, MS_PER_DAY};

/// Longest call accepted by [`normalize_calls`]; bounds the buckets one call can create.
pub const MAX_CALL_SPAN_DAYS: i64 = 7;

/// One phone call as delivered by the dataset API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub customer_id: i64,
    pub call_id: String,
    /// Epoch milliseconds.
    pub start_timestamp: i64,
    /// Epoch milliseconds.
    pub end_timestamp: i64,
}

impl Call {
    pub fn new(
        customer_id: i64,
        call_id: impl Into<String>,
        start_timestamp: i64,
        end_timestamp: i64,
    ) -> Self {
        Self {
            customer_id,
            call_id: call_id.into(),
            start_timestamp,
            end_timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallRecordsResponse {
    pub call_records: Vec<Call>,
}

/// Peak concurrency for one customer on one UTC day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConcurrencyResult {
    pub customer_id: i64,
    pub date: DayKey,
    pub max_concurrent_calls: usize,
    pub timestamp: i64,
    pub call_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultsSubmission {
    pub results: Vec<ConcurrencyResult>,
}

impl From<Vec<ConcurrencyResult>> for ResultsSubmission {
    fn from(results: Vec<ConcurrencyResult>) -> Self {
        Self { results }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Reject calls the sweep cannot give a meaningful answer for.
///
/// Repeated call ids are kept as-is.
pub fn normalize_calls(calls: Vec<Call>) -> Result<Vec<Call>, ValidationError> {
    for call in &calls {
        if call.call_id.trim().is_empty() {
            return Err(ValidationError::new(format!(
                "call for customer {} has an empty callId",
                call.customer_id
            )));
        }

        if call.start_timestamp < 0 || call.end_timestamp < 0 {
            return Err(ValidationError::new(format!(
                "call '{}' has a negative timestamp",
                call.call_id
            )));
        }

        if call.start_timestamp > call.end_timestamp {
            return Err(ValidationError::new(format!(
                "call '{}' ends before it starts ({} > {})",
                call.call_id, call.start_timestamp, call.end_timestamp
            )));
        }

        if call.end_timestamp - call.start_timestamp > MAX_CALL_SPAN_DAYS * MS_PER_DAY {
            return Err(ValidationError::new(format!(
                "call '{}' exceeds MAX_CALL_SPAN_DAYS={MAX_CALL_SPAN_DAYS}",
                call.call_id
            )));
        }

        if DayKey::containing(call.end_timestamp).is_none() {
            return Err(ValidationError::new(format!(
                "call '{}' has a timestamp outside the supported calendar range",
                call.call_id
            )));
        }
    }

    Ok(calls)
}

pub fn dataset_fingerprint(calls: &[Call]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(stable_contract_json(calls));
    format!("{:x}", hasher.finalize())
}

pub fn stable_contract_json(value: impl Serialize) -> String {
    serde_json::to_string(&value).expect("serialization of contract value should not fail")
}
