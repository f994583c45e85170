//! Blocking HTTP client for the call dataset and result endpoints.

use std::time::Duration;

use call_concurrency_core::{Call, CallRecordsResponse, ResultsSubmission};
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use tracing::debug;

use super::call_source::CallSource;
use super::result_sink::ResultSink;
use crate::config::ServiceConfig;
use crate::error::AdapterError;

/// Thin HTTP client: `GET` the dataset, `POST` the results.
#[derive(Debug, Clone)]
pub struct HttpCallsApi {
    client: Client,
    dataset_url: Url,
    result_url: Option<Url>,
}

impl HttpCallsApi {
    pub fn new(
        dataset_url: Url,
        result_url: Option<Url>,
        request_timeout: Duration,
    ) -> Result<Self, AdapterError> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            dataset_url,
            result_url,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, AdapterError> {
        Self::new(
            config.dataset_url.clone(),
            config.result_url.clone(),
            config.request_timeout,
        )
    }
}

impl CallSource for HttpCallsApi {
    fn fetch_calls(&self) -> Result<Vec<Call>, AdapterError> {
        debug!(path = self.dataset_url.path(), "fetching call records");
        let response = self.client.get(self.dataset_url.clone()).send()?;
        let parsed: CallRecordsResponse = ensure_success(response)?.json()?;
        Ok(parsed.call_records)
    }
}

impl ResultSink for HttpCallsApi {
    fn submit(&self, submission: &ResultsSubmission) -> Result<String, AdapterError> {
        let Some(url) = &self.result_url else {
            return Err(AdapterError::Unavailable(
                "no result endpoint configured".to_string(),
            ));
        };

        debug!(
            path = url.path(),
            results = submission.results.len(),
            "posting results"
        );
        // `.json` sets `Content-Type: application/json`.
        let response = self.client.post(url.clone()).json(submission).send()?;
        Ok(ensure_success(response)?.text()?)
    }
}

fn ensure_success(response: Response) -> Result<Response, AdapterError> {
    check_status(response.status())?;
    Ok(response)
}

fn check_status(status: StatusCode) -> Result<(), AdapterError> {
    if status.is_success() {
        return Ok(());
    }
    Err(AdapterError::Status {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("unknown").to_string(),
    })
}
