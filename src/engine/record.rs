use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use super::slot::MethodKind;

/// Shared ownership of a host instance. Methods and observers borrow through
/// the cell only for as long as they need, which keeps nested intercepted
/// calls on the same receiver legal.
pub type Handle<T> = Rc<RefCell<T>>;

pub fn handle<T>(value: T) -> Handle<T> {
    Rc::new(RefCell::new(value))
}

/// Deferred computation passed through to the wrapped call. Opaque to
/// observers: they may see that one is present, the protocol never runs it.
pub type Block = Rc<dyn Fn(&[Value]) -> Value>;

pub enum Receiver<T> {
    Instance(Handle<T>),
    Type,
}

impl<T> Receiver<T> {
    pub fn instance(&self) -> Option<&Handle<T>> {
        match self {
            Receiver::Instance(handle) => Some(handle),
            Receiver::Type => None,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Receiver::Type)
    }
}

impl<T> Clone for Receiver<T> {
    fn clone(&self) -> Self {
        match self {
            Receiver::Instance(handle) => Receiver::Instance(handle.clone()),
            Receiver::Type => Receiver::Type,
        }
    }
}

impl<T> fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receiver::Instance(_) => write!(f, "Receiver::Instance(..)"),
            Receiver::Type => write!(f, "Receiver::Type"),
        }
    }
}

/// One invocation of an intercepted method. Created fresh per call, shared by
/// reference with every observer of that call, discarded after.
///
/// Invariant: `exception` and `return_value` are both `None` while
/// before-observers run; exactly one is set once the call resolves. Only the
/// interception protocol mutates them.
pub struct CallRecord<T> {
    /// Correlates the before/after/exception trace entries of one invocation.
    pub id: Uuid,
    pub receiver: Receiver<T>,
    pub method: String,
    pub kind: MethodKind,
    pub args: Vec<Value>,
    pub block: Option<Block>,
    pub exception: Option<Arc<anyhow::Error>>,
    pub return_value: Option<Value>,
}

impl<T> CallRecord<T> {
    pub(crate) fn new(
        receiver: Receiver<T>,
        method: &str,
        kind: MethodKind,
        args: Vec<Value>,
        block: Option<Block>,
    ) -> Self {
        CallRecord {
            id: Uuid::new_v4(),
            receiver,
            method: method.to_string(),
            kind,
            args,
            block,
            exception: None,
            return_value: None,
        }
    }
}

impl<T> fmt::Debug for CallRecord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallRecord")
            .field("id", &self.id)
            .field("receiver", &self.receiver)
            .field("method", &self.method)
            .field("kind", &self.kind)
            .field("args", &self.args)
            .field("block", &self.block.as_ref().map(|_| "<block>"))
            .field("exception", &self.exception)
            .field("return_value", &self.return_value)
            .finish()
    }
}
