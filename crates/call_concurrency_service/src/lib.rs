//! HTTP adapters and run handler around `call_concurrency_core`.
//!
//! This crate owns the I/O collaborators of a run: fetching the call dataset,
//! posting the computed results, configuration, logging setup and the
//! `call_concurrency` binary. The computation itself stays in the core crate.

pub mod adapters;
pub mod config;
pub mod error;
pub mod export;
pub mod handlers;
pub mod logging;

pub use error::{AdapterError, ServiceError};
