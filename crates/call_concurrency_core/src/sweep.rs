//! Sweep-line over call start/end events.
//!
//! Events are processed in time order with every `End` at an instant handled
//! before any `Start` at the same instant, so a call hanging up at `t` and a
//! call connecting at `t` are never counted together. The first time the
//! active set grows past the running maximum, the instant and an owned
//! snapshot of the active call ids are recorded.
//!
//! A zero-length call becomes a single `Instant` event, handled after the
//! ends and before the starts at its instant: it joins the active set, is
//! checked against the peak, and leaves again immediately.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::contract::Call;
use crate::day::DayWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SweepEventKind {
    // Declaration order is the tie-break order.
    End,
    Instant,
    Start,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepEvent<'a> {
    pub time: i64,
    pub kind: SweepEventKind,
    pub call_id: &'a str,
}

impl Ord for SweepEvent<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Same-kind ties commute; the call id only pins down a stable order.
        self.time
            .cmp(&other.time)
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.call_id.cmp(other.call_id))
    }
}

impl PartialOrd for SweepEvent<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Highest concurrency reached in a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peak {
    pub max_concurrent_calls: usize,
    /// Start time of the call that first pushed concurrency to the maximum.
    pub timestamp: i64,
    /// Calls active at `timestamp`, sorted.
    pub call_ids: Vec<String>,
}

/// Sorted start/end events for the calls overlapping `window`.
pub fn build_events<'a>(calls: &[&'a Call], window: DayWindow) -> Vec<SweepEvent<'a>> {
    let mut events: Vec<SweepEvent<'a>> = calls
        .iter()
        .copied()
        .filter(|call| window.overlaps(call))
        .flat_map(|call| {
            let call_id = call.call_id.as_str();
            if call.start_timestamp == call.end_timestamp {
                return vec![SweepEvent {
                    time: call.start_timestamp,
                    kind: SweepEventKind::Instant,
                    call_id,
                }];
            }
            vec![
                SweepEvent {
                    time: call.start_timestamp,
                    kind: SweepEventKind::Start,
                    call_id,
                },
                SweepEvent {
                    time: call.end_timestamp,
                    kind: SweepEventKind::End,
                    call_id,
                },
            ]
        })
        .collect();

    events.sort_unstable();
    events
}

/// Walk sorted events and return the first-seen peak, or `None` when no call
/// was ever active.
pub fn sweep_events(events: &[SweepEvent<'_>]) -> Option<Peak> {
    let mut active: BTreeSet<&str> = BTreeSet::new();
    let mut peak: Option<Peak> = None;
    let mut max_concurrent_calls = 0usize;

    for event in events {
        match event.kind {
            SweepEventKind::Start => {
                active.insert(event.call_id);
                record_peak(&active, event.time, &mut max_concurrent_calls, &mut peak);
            }
            SweepEventKind::Instant => {
                // A repeated id already active keeps its own membership.
                let inserted = active.insert(event.call_id);
                record_peak(&active, event.time, &mut max_concurrent_calls, &mut peak);
                if inserted {
                    active.remove(event.call_id);
                }
            }
            SweepEventKind::End => {
                active.remove(event.call_id);
            }
        }
    }

    peak
}

fn record_peak(
    active: &BTreeSet<&str>,
    time: i64,
    max_concurrent_calls: &mut usize,
    peak: &mut Option<Peak>,
) {
    if active.len() > *max_concurrent_calls {
        *max_concurrent_calls = active.len();
        *peak = Some(Peak {
            max_concurrent_calls: active.len(),
            timestamp: time,
            call_ids: active.iter().map(|id| id.to_string()).collect(),
        });
    }
}

pub fn peak_for_bucket(calls: &[&Call], window: DayWindow) -> Option<Peak> {
    sweep_events(&build_events(calls, window))
}
