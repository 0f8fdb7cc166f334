use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Failures visible to callers of the dynamic call surface.
///
/// `NoSuchMethod` covers failed dispatch AND failed named-observer resolution.
/// The two must stay indistinguishable: a misconfigured observer is a missing
/// method, not an application error, and the exception machinery never
/// catches it.
#[derive(Debug, Clone, Error)]
pub enum CallError {
    #[error("no method `{name}` on `{type_name}`")]
    NoSuchMethod {
        type_name: &'static str,
        name: String,
    },

    /// The intercepted method itself failed. The `Arc` is shared between the
    /// CallRecord handed to on-exception observers and the error returned to
    /// the caller, so both see the identical value.
    #[error("{0}")]
    Raised(Arc<anyhow::Error>),
}

impl CallError {
    pub fn missing<T>(name: &str) -> Self {
        CallError::NoSuchMethod {
            type_name: std::any::type_name::<T>(),
            name: name.to_string(),
        }
    }

    pub fn raised(err: impl Into<anyhow::Error>) -> Self {
        CallError::Raised(Arc::new(err.into()))
    }
}

impl From<anyhow::Error> for CallError {
    fn from(err: anyhow::Error) -> Self {
        CallError::Raised(Arc::new(err))
    }
}

pub type CallResult = Result<Value, CallError>;
