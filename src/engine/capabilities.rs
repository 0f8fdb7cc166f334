use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use super::error::CallResult;
use super::interceptor::OriginalFn;
use super::record::{Block, CallRecord, Handle, Receiver};
use super::registry::Registry;
use super::slot::{MethodKind, MethodSlot};

pub type InstanceFn<T> =
    Rc<dyn Fn(&Registry<T>, &Handle<T>, &[Value], Option<&Block>) -> CallResult>;
pub type TypeFn<T> = Rc<dyn Fn(&Registry<T>, &[Value], Option<&Block>) -> CallResult>;
pub type HookFn<T> = Rc<dyn Fn(&Registry<T>, &CallRecord<T>)>;

/// The capability surface a host type supplies: its callable methods (dynamic
/// `Value` arguments and returns) and its named observer hooks.
///
/// Mutation is setup-time only. During calls the tables are read-only, which
/// is what makes reentrant dispatch safe.
pub struct Capabilities<T> {
    instance_methods: HashMap<String, InstanceFn<T>>,
    type_methods: HashMap<String, TypeFn<T>>,
    instance_hooks: HashMap<String, HookFn<T>>,
    type_hooks: HashMap<String, HookFn<T>>,
}

impl<T> Capabilities<T> {
    pub fn new() -> Self {
        Capabilities {
            instance_methods: HashMap::new(),
            type_methods: HashMap::new(),
            instance_hooks: HashMap::new(),
            type_hooks: HashMap::new(),
        }
    }

    pub fn define(
        &mut self,
        name: &str,
        f: impl Fn(&Registry<T>, &Handle<T>, &[Value], Option<&Block>) -> CallResult + 'static,
    ) {
        self.instance_methods.insert(name.to_string(), Rc::new(f));
    }

    pub fn define_type(
        &mut self,
        name: &str,
        f: impl Fn(&Registry<T>, &[Value], Option<&Block>) -> CallResult + 'static,
    ) {
        self.type_methods.insert(name.to_string(), Rc::new(f));
    }

    pub fn define_hook(&mut self, name: &str, f: impl Fn(&Registry<T>, &CallRecord<T>) + 'static) {
        self.instance_hooks.insert(name.to_string(), Rc::new(f));
    }

    pub fn define_type_hook(
        &mut self,
        name: &str,
        f: impl Fn(&Registry<T>, &CallRecord<T>) + 'static,
    ) {
        self.type_hooks.insert(name.to_string(), Rc::new(f));
    }

    pub(crate) fn instance_method(&self, name: &str) -> Option<&InstanceFn<T>> {
        self.instance_methods.get(name)
    }

    pub(crate) fn type_method(&self, name: &str) -> Option<&TypeFn<T>> {
        self.type_methods.get(name)
    }

    /// The aliasing primitive: move the original callable out of the public
    /// dispatch slot so the interceptor becomes its only owner. A second call
    /// for the same slot returns None, which is how wrap-once is enforced.
    pub(crate) fn take_method(&mut self, slot: &MethodSlot) -> Option<OriginalFn<T>> {
        match slot.kind {
            MethodKind::Instance => self
                .instance_methods
                .remove(&slot.name)
                .map(OriginalFn::Instance),
            MethodKind::Type => self.type_methods.remove(&slot.name).map(OriginalFn::Type),
        }
    }

    /// Named-capability lookup: instance receivers search their own hook
    /// table first, then the type-level table; type receivers only the
    /// latter.
    pub(crate) fn resolve_hook(&self, receiver: &Receiver<T>, name: &str) -> Option<&HookFn<T>> {
        match receiver {
            Receiver::Instance(_) => self
                .instance_hooks
                .get(name)
                .or_else(|| self.type_hooks.get(name)),
            Receiver::Type => self.type_hooks.get(name),
        }
    }
}

impl<T> Default for Capabilities<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Capabilities<T> {
    fn clone(&self) -> Self {
        Capabilities {
            instance_methods: self.instance_methods.clone(),
            type_methods: self.type_methods.clone(),
            instance_hooks: self.instance_hooks.clone(),
            type_hooks: self.type_hooks.clone(),
        }
    }
}
