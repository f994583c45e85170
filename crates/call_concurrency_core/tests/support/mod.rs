#![allow(dead_code)]

use call_concurrency_core::Call;

pub const JAN_1_2024_MS: i64 = 1_704_067_200_000;
pub const HOUR_MS: i64 = 60 * 60 * 1000;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Call for `customer_id` between two offsets from 2024-01-01T00:00:00Z.
pub fn call_at(customer_id: i64, call_id: &str, start_offset_ms: i64, end_offset_ms: i64) -> Call {
    Call::new(
        customer_id,
        call_id,
        JAN_1_2024_MS + start_offset_ms,
        JAN_1_2024_MS + end_offset_ms,
    )
}

pub fn sorted_keys(results: &[call_concurrency_core::ConcurrencyResult]) -> Vec<(i64, String)> {
    let mut keys: Vec<(i64, String)> = results
        .iter()
        .map(|result| (result.customer_id, result.date.to_string()))
        .collect();
    keys.sort();
    keys
}
