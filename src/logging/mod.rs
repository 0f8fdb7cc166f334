//! Default observers and the in-memory call trace.
//!
//! # INVARIANT
//! The trace is a WRITE-ONLY side channel. The interception engine never
//! reads it back into dispatch or protocol decisions; it exists for
//! observability and for tests.

pub mod defaults;
pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::TraceEvent;
pub use metrics::{compute_summary, TraceSummary};
pub use recorder::{CallTrace, CallTraceHandle};
