use std::process::ExitCode;

use call_concurrency_service::adapters::http::HttpCallsApi;
use call_concurrency_service::config::Cli;
use call_concurrency_service::handlers::run::{handle_run, RunReport};
use call_concurrency_service::logging::init_logging;
use call_concurrency_service::ServiceError;
use clap::Parser;
use tracing::error;

fn run(cli: Cli) -> Result<RunReport, ServiceError> {
    let config = cli.into_config()?;
    let api = HttpCallsApi::from_config(&config).map_err(ServiceError::ClientSetup)?;
    handle_run(&config.run, &api, &api)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = init_logging(cli.verbose, cli.json_logs) {
        eprintln!("failed to initialise logging: {error}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(report) => {
            let stats = &report.statistics;
            println!(
                "{} calls, {} customer-days, {} results (dataset {})",
                stats.total_calls, stats.bucket_count, stats.result_count, report.dataset_fingerprint
            );
            if let Some(busiest) = &stats.busiest {
                println!(
                    "busiest: customer {} on {} with {} concurrent calls at {}",
                    busiest.customer_id,
                    busiest.date,
                    busiest.max_concurrent_calls,
                    busiest.timestamp
                );
            }
            if let Some(response) = &report.receiver_response {
                println!("results posted successfully: {response}");
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!(event = "run_failed", %error, "concurrency run aborted");
            ExitCode::FAILURE
        }
    }
}
