use std::rc::Rc;

use super::error::CallError;
use super::record::CallRecord;
use super::registry::Registry;

pub type InlineFn<T> = Rc<dyn Fn(&CallRecord<T>)>;

/// A before/after/on-exception hook attached to an intercepted method.
///
/// Exactly one variant is chosen at construction and never changes. Inline
/// observers are resolved once; named observers are resolved against the
/// receiver's hook tables on every call.
pub enum Observer<T> {
    Inline(InlineFn<T>),
    Named(String),
}

impl<T> Observer<T> {
    pub fn inline(f: impl Fn(&CallRecord<T>) + 'static) -> Self {
        Observer::Inline(Rc::new(f))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Observer::Named(name.into())
    }

    /// Run the observer against a record. Named lookup goes instance-first,
    /// type-second; an unresolved name is a `NoSuchMethod`, never an
    /// application error.
    pub(crate) fn call(
        &self,
        registry: &Registry<T>,
        record: &CallRecord<T>,
    ) -> Result<(), CallError> {
        match self {
            Observer::Inline(f) => {
                f(record);
                Ok(())
            }
            Observer::Named(name) => match registry.resolve_hook(&record.receiver, name) {
                Some(hook) => {
                    hook(registry, record);
                    Ok(())
                }
                None => Err(CallError::missing::<T>(name)),
            },
        }
    }
}

/// Adapter for zero-argument legacy callbacks: wraps them into the single
/// record-taking observer signature.
pub fn without_record<T>(f: impl Fn() + 'static) -> impl Fn(&CallRecord<T>) {
    move |_call| f()
}
