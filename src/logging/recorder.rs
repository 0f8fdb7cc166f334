use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::event::TraceEvent;
use super::metrics::{compute_summary, TraceSummary};

const MAX_EVENTS: usize = 10_000;

pub type CallTraceHandle = Rc<RefCell<CallTrace>>;

/// Bounded ring buffer of trace events. Oldest entries are evicted first.
#[derive(Debug)]
pub struct CallTrace {
    buffer: VecDeque<TraceEvent>,
}

impl CallTrace {
    pub fn new() -> Self {
        CallTrace {
            buffer: VecDeque::with_capacity(MAX_EVENTS),
        }
    }

    pub fn handle() -> CallTraceHandle {
        Rc::new(RefCell::new(CallTrace::new()))
    }

    pub fn record(&mut self, event: TraceEvent) {
        if self.buffer.len() >= MAX_EVENTS {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn snapshot(&self) -> Vec<TraceEvent> {
        self.buffer.iter().cloned().collect()
    }

    pub fn summary(&self) -> TraceSummary {
        // Delegate to the pure metrics module
        compute_summary(&self.buffer)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for CallTrace {
    fn default() -> Self {
        Self::new()
    }
}
