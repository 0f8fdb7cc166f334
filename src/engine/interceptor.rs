use serde_json::Value;

use super::capabilities::{InstanceFn, TypeFn};
use super::error::{CallError, CallResult};
use super::observer::Observer;
use super::record::{Block, CallRecord, Receiver};
use super::registry::Registry;
use super::slot::{MethodKind, MethodSlot};

/// The original callable, moved out of the public dispatch slot at wrap time.
/// Holding it here (instead of a shared scratch map) is what makes the alias
/// unreachable through normal dispatch.
pub(crate) enum OriginalFn<T> {
    Instance(InstanceFn<T>),
    Type(TypeFn<T>),
}

/// Owns the original implementation of one (type, method, kind) slot plus the
/// three ordered observer lists, and drives the before/call/after/on-exception
/// protocol for every invocation of that slot.
pub struct Interceptor<T> {
    method: String,
    kind: MethodKind,
    original: OriginalFn<T>,
    before: Vec<Observer<T>>,
    after: Vec<Observer<T>>,
    on_exception: Vec<Observer<T>>,
}

impl<T> Interceptor<T> {
    pub(crate) fn new(slot: &MethodSlot, original: OriginalFn<T>) -> Self {
        Interceptor {
            method: slot.name.clone(),
            kind: slot.kind,
            original,
            before: Vec::new(),
            after: Vec::new(),
            on_exception: Vec::new(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    // Registration appends in order, no de-duplication. Registration order is
    // invocation order.

    pub fn before(&mut self, f: impl Fn(&CallRecord<T>) + 'static) {
        self.before.push(Observer::inline(f));
    }

    pub fn after(&mut self, f: impl Fn(&CallRecord<T>) + 'static) {
        self.after.push(Observer::inline(f));
    }

    pub fn on_exception(&mut self, f: impl Fn(&CallRecord<T>) + 'static) {
        self.on_exception.push(Observer::inline(f));
    }

    pub fn before_named(&mut self, name: &str) {
        self.before.push(Observer::named(name));
    }

    pub fn after_named(&mut self, name: &str) {
        self.after.push(Observer::named(name));
    }

    pub fn on_exception_named(&mut self, name: &str) {
        self.on_exception.push(Observer::named(name));
    }

    /// The wrapped replacement for the original method.
    ///
    /// At most one of the after / on-exception phases runs per invocation.
    /// A `NoSuchMethod` anywhere aborts immediately and is never delivered to
    /// the exception machinery: interception setup mistakes must not read as
    /// application failures.
    pub(crate) fn invoke(
        &self,
        registry: &Registry<T>,
        receiver: Receiver<T>,
        args: Vec<Value>,
        block: Option<Block>,
    ) -> CallResult {
        let mut record = CallRecord::new(receiver, &self.method, self.kind, args, block);

        // === 1. BEFORE ===
        // Full registration order, before the original runs. A failed named
        // resolution aborts here; the original must not execute.
        for observer in &self.before {
            observer.call(registry, &record)?;
        }

        // === 2. CALL ===
        let outcome = self.call_original(registry, &record);

        match outcome {
            // === 3a. AFTER (normal return) ===
            Ok(value) => {
                record.return_value = Some(value.clone());
                for observer in &self.after {
                    observer.call(registry, &record)?;
                }
                Ok(value)
            }
            // Resolution failures from inside the call pass through verbatim.
            Err(err @ CallError::NoSuchMethod { .. }) => Err(err),
            // === 3b. ON-EXCEPTION (observed method raised) ===
            // The record and the caller share the same Arc: observers see
            // exactly the error the caller gets, and cannot replace it.
            Err(CallError::Raised(err)) => {
                record.exception = Some(err.clone());
                for observer in &self.on_exception {
                    observer.call(registry, &record)?;
                }
                Err(CallError::Raised(err))
            }
        }
    }

    fn call_original(&self, registry: &Registry<T>, record: &CallRecord<T>) -> CallResult {
        match (&self.original, &record.receiver) {
            (OriginalFn::Instance(f), Receiver::Instance(target)) => {
                f(registry, target, &record.args, record.block.as_ref())
            }
            (OriginalFn::Type(f), _) => f(registry, &record.args, record.block.as_ref()),
            // An instance slot dispatched without an instance: nothing to call.
            (OriginalFn::Instance(_), Receiver::Type) => {
                Err(CallError::missing::<T>(&self.method))
            }
        }
    }
}
