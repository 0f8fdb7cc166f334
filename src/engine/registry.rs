use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, Level};

use crate::logging::defaults;
use crate::logging::recorder::{CallTrace, CallTraceHandle};

use super::capabilities::{Capabilities, HookFn};
use super::error::{CallError, CallResult};
use super::interceptor::Interceptor;
use super::record::{Block, CallRecord, Handle, Receiver};
use super::slot::MethodSlot;

/// Per-type interception surface: the host's capability tables, the
/// (kind, name) -> Interceptor store, and the dynamic call surface.
///
/// Shape mutation (defining capabilities, intercepting, registering
/// observers) is single-threaded-at-setup; during calls everything here is
/// read-only, so nested dispatch through method bodies is legal. The whole
/// registry is single-threaded by construction (`Rc`, `RefCell`).
pub struct Registry<T> {
    caps: Capabilities<T>,
    interceptors: HashMap<MethodSlot, Interceptor<T>>,
    trace: CallTraceHandle,
    default_level: Level,
}

impl<T> Registry<T> {
    pub fn new() -> Self
    where
        T: 'static,
    {
        let mut caps = Capabilities::new();
        defaults::install(&mut caps);
        Registry {
            caps,
            interceptors: HashMap::new(),
            trace: CallTrace::handle(),
            default_level: Level::DEBUG,
        }
    }

    /// Independent registry starting from a copy of `parent`'s capability
    /// tables. Interception state is NOT shared: observers and wrapping on
    /// the parent stay on the parent.
    pub fn seeded_from(parent: &Registry<T>) -> Self {
        Registry {
            caps: parent.caps.clone(),
            interceptors: HashMap::new(),
            trace: CallTrace::handle(),
            default_level: parent.default_level,
        }
    }

    // --- Capability registration (setup-time) ---

    pub fn define(
        &mut self,
        name: &str,
        f: impl Fn(&Registry<T>, &Handle<T>, &[Value], Option<&Block>) -> CallResult + 'static,
    ) {
        self.caps.define(name, f);
    }

    pub fn define_type(
        &mut self,
        name: &str,
        f: impl Fn(&Registry<T>, &[Value], Option<&Block>) -> CallResult + 'static,
    ) {
        self.caps.define_type(name, f);
    }

    pub fn define_hook(&mut self, name: &str, f: impl Fn(&Registry<T>, &CallRecord<T>) + 'static) {
        self.caps.define_hook(name, f);
    }

    pub fn define_type_hook(
        &mut self,
        name: &str,
        f: impl Fn(&Registry<T>, &CallRecord<T>) + 'static,
    ) {
        self.caps.define_type_hook(name, f);
    }

    // --- Activation surface ---

    /// Wrap the named methods (a `self.` prefix marks type-level) and let
    /// `configure` register observers on each interceptor.
    ///
    /// Idempotent per slot: the first call moves the original out of the
    /// capability table into a fresh interceptor; later calls fetch the
    /// existing interceptor and layer observers on without re-wrapping.
    /// Intercepting a name that was never defined fails with `NoSuchMethod`.
    pub fn intercept(
        &mut self,
        methods: &[&str],
        mut configure: impl FnMut(&mut Interceptor<T>),
    ) -> Result<(), CallError> {
        for raw in methods {
            let slot = MethodSlot::parse(raw);
            if !self.interceptors.contains_key(&slot) {
                let original = self
                    .caps
                    .take_method(&slot)
                    .ok_or_else(|| CallError::missing::<T>(&slot.name))?;
                debug!(method = %slot.name, kind = ?slot.kind, "installing interceptor");
                self.interceptors
                    .insert(slot.clone(), Interceptor::new(&slot, original));
            }
            if let Some(interceptor) = self.interceptors.get_mut(&slot) {
                configure(interceptor);
            }
        }
        Ok(())
    }

    /// `intercept` with the fixed default observer set: named observers
    /// pointing at the well-known logging hooks, which are seeded into the
    /// type-level hook table at construction. Re-define a hook under the same
    /// name to override the default behavior.
    pub fn intercept_logged(&mut self, methods: &[&str]) -> Result<(), CallError> {
        self.intercept(methods, |interceptor| {
            interceptor.before_named(defaults::LOG_BEFORE);
            interceptor.after_named(defaults::LOG_AFTER);
            interceptor.on_exception_named(defaults::LOG_ON_EXCEPTION);
        })
    }

    // --- Dynamic call surface ---

    pub fn call(&self, target: &Handle<T>, method: &str, args: Vec<Value>) -> CallResult {
        self.dispatch_instance(target, method, args, None)
    }

    pub fn call_with_block(
        &self,
        target: &Handle<T>,
        method: &str,
        args: Vec<Value>,
        block: Block,
    ) -> CallResult {
        self.dispatch_instance(target, method, args, Some(block))
    }

    pub fn call_type(&self, method: &str, args: Vec<Value>) -> CallResult {
        self.dispatch_type(method, args, None)
    }

    pub fn call_type_with_block(&self, method: &str, args: Vec<Value>, block: Block) -> CallResult {
        self.dispatch_type(method, args, Some(block))
    }

    fn dispatch_instance(
        &self,
        target: &Handle<T>,
        method: &str,
        args: Vec<Value>,
        block: Option<Block>,
    ) -> CallResult {
        let slot = MethodSlot::instance(method);
        if let Some(interceptor) = self.interceptors.get(&slot) {
            return interceptor.invoke(self, Receiver::Instance(target.clone()), args, block);
        }
        match self.caps.instance_method(method) {
            Some(f) => f(self, target, &args, block.as_ref()),
            None => Err(CallError::missing::<T>(method)),
        }
    }

    fn dispatch_type(&self, method: &str, args: Vec<Value>, block: Option<Block>) -> CallResult {
        let slot = MethodSlot::type_level(method);
        if let Some(interceptor) = self.interceptors.get(&slot) {
            return interceptor.invoke(self, Receiver::Type, args, block);
        }
        match self.caps.type_method(method) {
            Some(f) => f(self, &args, block.as_ref()),
            None => Err(CallError::missing::<T>(method)),
        }
    }

    // --- Observability ---

    /// Handle to the bounded call trace the default observers append to.
    pub fn trace(&self) -> CallTraceHandle {
        self.trace.clone()
    }

    pub fn default_log_level(&self) -> Level {
        self.default_level
    }

    /// Level the default observers emit their tracing events at.
    pub fn set_default_log_level(&mut self, level: Level) {
        self.default_level = level;
    }

    pub fn is_intercepted(&self, raw: &str) -> bool {
        self.interceptors.contains_key(&MethodSlot::parse(raw))
    }

    pub(crate) fn resolve_hook(&self, receiver: &Receiver<T>, name: &str) -> Option<&HookFn<T>> {
        self.caps.resolve_hook(receiver, name)
    }
}

impl<T: 'static> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
