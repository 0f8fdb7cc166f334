use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::engine::slot::MethodKind;

/// One phase of one intercepted invocation. The three entries of a single
/// invocation share its record id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TraceEvent {
    Entered {
        id: Uuid,
        method: String,
        kind: MethodKind,
        args: Vec<Value>,
    },
    Returned {
        id: Uuid,
        method: String,
        value: Value,
    },
    Raised {
        id: Uuid,
        method: String,
        message: String,
    },
}

impl TraceEvent {
    pub fn id(&self) -> Uuid {
        match self {
            TraceEvent::Entered { id, .. }
            | TraceEvent::Returned { id, .. }
            | TraceEvent::Raised { id, .. } => *id,
        }
    }

    pub fn method(&self) -> &str {
        match self {
            TraceEvent::Entered { method, .. }
            | TraceEvent::Returned { method, .. }
            | TraceEvent::Raised { method, .. } => method,
        }
    }
}
