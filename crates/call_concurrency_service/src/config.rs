//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::error::ServiceError;
use crate::handlers::run::RunOptions;

const USER_KEY_PARAM: &str = "userKey";

#[derive(Debug, Parser)]
#[command(
    name = "call-concurrency",
    about = "Compute per-customer daily peak call concurrency",
    long_about = "Fetches call records from the dataset endpoint, computes the maximum\n\
                  number of concurrent calls per customer and UTC day, and posts the\n\
                  results to the result endpoint."
)]
pub struct Cli {
    /// Endpoint returning `{ "callRecords": [...] }`
    #[arg(long, env = "CALLS_DATASET_URL")]
    pub dataset_url: String,

    /// Endpoint accepting `{ "results": [...] }`; required unless --dry-run
    #[arg(long, env = "CALLS_RESULT_URL")]
    pub result_url: Option<String>,

    /// Appended to both endpoints as the `userKey` query parameter
    #[arg(long, env = "CALLS_USER_KEY", hide_env_values = true)]
    pub user_key: Option<String>,

    /// Per-request timeout
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Worker threads for the sweep (defaults to the number of CPUs)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Also write the results body to this JSON file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Compute results without posting them
    #[arg(long)]
    pub dry_run: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub dataset_url: Url,
    pub result_url: Option<Url>,
    pub request_timeout: Duration,
    pub run: RunOptions,
}

impl Cli {
    pub fn into_config(self) -> Result<ServiceConfig, ServiceError> {
        if self.timeout_secs == 0 {
            return Err(ServiceError::Config(
                "timeout-secs must be a positive integer".to_string(),
            ));
        }

        if let Some(0) = self.threads {
            return Err(ServiceError::Config(
                "threads must be a positive integer".to_string(),
            ));
        }

        let user_key = self
            .user_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty());

        let dataset_url = parse_endpoint("dataset-url", &self.dataset_url, user_key)?;
        let result_url = match self.result_url.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Some(parse_endpoint("result-url", text, user_key)?),
            _ if self.dry_run => None,
            _ => {
                return Err(ServiceError::Config(
                    "result-url is required unless --dry-run is set".to_string(),
                ));
            }
        };

        Ok(ServiceConfig {
            dataset_url,
            result_url,
            request_timeout: Duration::from_secs(self.timeout_secs),
            run: RunOptions {
                threads: self.threads,
                output: self.output,
                dry_run: self.dry_run,
            },
        })
    }
}

fn parse_endpoint(name: &str, text: &str, user_key: Option<&str>) -> Result<Url, ServiceError> {
    let mut url = Url::parse(text.trim())
        .map_err(|error| ServiceError::Config(format!("{name} is not a valid URL: {error}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ServiceError::Config(format!(
            "{name} must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if let Some(key) = user_key {
        url.query_pairs_mut().append_pair(USER_KEY_PARAM, key);
    }
    Ok(url)
}
