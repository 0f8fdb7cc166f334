use serde::{Deserialize, Serialize};

/// Instance-level vs type-level method classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    Instance,
    Type,
}

/// A (kind, bare name) dispatch key. One interceptor exists per slot at most.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSlot {
    pub kind: MethodKind,
    pub name: String,
}

impl MethodSlot {
    /// Naming convention: a `self.` prefix marks a type-level method.
    /// The prefix is stripped; the bare name is the dispatch key.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix("self.") {
            Some(bare) => MethodSlot {
                kind: MethodKind::Type,
                name: bare.to_string(),
            },
            None => MethodSlot {
                kind: MethodKind::Instance,
                name: raw.to_string(),
            },
        }
    }

    pub fn instance(name: &str) -> Self {
        MethodSlot {
            kind: MethodKind::Instance,
            name: name.to_string(),
        }
    }

    pub fn type_level(name: &str) -> Self {
        MethodSlot {
            kind: MethodKind::Type,
            name: name.to_string(),
        }
    }
}
