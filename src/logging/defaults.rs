use tracing::{debug, error, info, trace, warn, Level};
use uuid::Uuid;

use crate::engine::capabilities::Capabilities;
use crate::engine::record::CallRecord;
use crate::engine::registry::Registry;
use crate::engine::slot::MethodKind;

use super::event::TraceEvent;

/// Well-known hook names the default observer set resolves against. They are
/// seeded into the type-level hook table at registry construction, so every
/// receiver finds them; a host re-defines a name to override the behavior.
pub const LOG_BEFORE: &str = "log_before";
pub const LOG_AFTER: &str = "log_after";
pub const LOG_ON_EXCEPTION: &str = "log_on_exception";

pub(crate) fn install<T: 'static>(caps: &mut Capabilities<T>) {
    caps.define_type_hook(LOG_BEFORE, log_before);
    caps.define_type_hook(LOG_AFTER, log_after);
    caps.define_type_hook(LOG_ON_EXCEPTION, log_on_exception);
}

pub fn log_before<T>(registry: &Registry<T>, call: &CallRecord<T>) {
    let args = serde_json::to_string(&call.args).unwrap_or_default();
    emit(
        registry.default_log_level(),
        call.id,
        &format!("calling {}({})", label(call), args),
    );
    registry.trace().borrow_mut().record(TraceEvent::Entered {
        id: call.id,
        method: call.method.clone(),
        kind: call.kind,
        args: call.args.clone(),
    });
}

pub fn log_after<T>(registry: &Registry<T>, call: &CallRecord<T>) {
    let value = call.return_value.clone().unwrap_or_default();
    emit(
        registry.default_log_level(),
        call.id,
        &format!("{} returned {}", label(call), value),
    );
    registry.trace().borrow_mut().record(TraceEvent::Returned {
        id: call.id,
        method: call.method.clone(),
        value,
    });
}

pub fn log_on_exception<T>(registry: &Registry<T>, call: &CallRecord<T>) {
    let message = call
        .exception
        .as_ref()
        .map(|err| err.to_string())
        .unwrap_or_default();
    emit(
        registry.default_log_level(),
        call.id,
        &format!("{} raised: {}", label(call), message),
    );
    registry.trace().borrow_mut().record(TraceEvent::Raised {
        id: call.id,
        method: call.method.clone(),
        message,
    });
}

/// Round-trips the activation naming convention: type-level methods are shown
/// with their `self.` prefix.
fn label<T>(call: &CallRecord<T>) -> String {
    match call.kind {
        MethodKind::Type => format!("self.{}", call.method),
        MethodKind::Instance => call.method.clone(),
    }
}

// tracing events take a const level; the configurable level picks the arm.
fn emit(level: Level, call_id: Uuid, message: &str) {
    if level == Level::ERROR {
        error!(call_id = %call_id, "{message}");
    } else if level == Level::WARN {
        warn!(call_id = %call_id, "{message}");
    } else if level == Level::INFO {
        info!(call_id = %call_id, "{message}");
    } else if level == Level::DEBUG {
        debug!(call_id = %call_id, "{message}");
    } else {
        trace!(call_id = %call_id, "{message}");
    }
}
