pub mod engine;
pub mod logging;

// Re-export specific items for convenient access
pub use engine::error::{CallError, CallResult};
pub use engine::interceptor::Interceptor;
pub use engine::observer::{without_record, Observer};
pub use engine::record::{handle, Block, CallRecord, Handle, Receiver};
pub use engine::registry::Registry;
pub use engine::slot::{MethodKind, MethodSlot};
