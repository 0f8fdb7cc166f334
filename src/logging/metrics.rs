use std::collections::VecDeque;

use serde::Serialize;

use super::event::TraceEvent;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraceSummary {
    pub entered: u64,
    pub returned: u64,
    pub raised: u64,
}

/// Pure function: fold the buffer into per-phase counts.
pub fn compute_summary(events: &VecDeque<TraceEvent>) -> TraceSummary {
    let mut summary = TraceSummary::default();

    for event in events {
        match event {
            TraceEvent::Entered { .. } => summary.entered += 1,
            TraceEvent::Returned { .. } => summary.returned += 1,
            TraceEvent::Raised { .. } => summary.raised += 1,
        }
    }

    summary
}
