//! Grouping calls into `(customer, day)` buckets.

use std::collections::BTreeMap;

use tracing::warn;

use crate::contract::Call;
use crate::day::DayKey;

/// Composite key; orders by customer first, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    pub customer_id: i64,
    pub day: DayKey,
}

pub type CallBuckets<'a> = BTreeMap<BucketKey, Vec<&'a Call>>;

/// Place every call in each UTC day it touches, from its start day to its end
/// day inclusive.
///
/// Nothing is filtered here: a call that merely touches a day boundary still
/// lands in that day's bucket, and the sweep's overlap test decides whether it
/// counts. Calls whose timestamps fall outside the calendar range are skipped.
pub fn partition_calls(calls: &[Call]) -> CallBuckets<'_> {
    let mut buckets = CallBuckets::new();

    for call in calls {
        let (Some(start_day), Some(end_day)) = (
            DayKey::containing(call.start_timestamp),
            DayKey::containing(call.end_timestamp),
        ) else {
            warn!(
                call_id = %call.call_id,
                customer_id = call.customer_id,
                "skipping call with undatable timestamp"
            );
            continue;
        };

        for day in touched_days(start_day, end_day) {
            buckets
                .entry(BucketKey {
                    customer_id: call.customer_id,
                    day,
                })
                .or_default()
                .push(call);
        }
    }

    buckets
}

fn touched_days(start_day: DayKey, end_day: DayKey) -> Vec<DayKey> {
    if end_day <= start_day {
        // Inverted calls still reach both named days.
        return if end_day == start_day {
            vec![start_day]
        } else {
            vec![start_day, end_day]
        };
    }

    let mut days = vec![start_day];
    let mut cursor = start_day;
    while cursor < end_day {
        match cursor.next() {
            Some(next) => {
                days.push(next);
                cursor = next;
            }
            None => break,
        }
    }
    days
}
