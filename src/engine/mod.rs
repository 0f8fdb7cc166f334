pub mod capabilities;
pub mod error;
pub mod interceptor;
pub mod observer;
pub mod record;
pub mod registry;
pub mod slot;

pub use error::{CallError, CallResult};
pub use interceptor::Interceptor;
pub use observer::Observer;
pub use record::{handle, Block, CallRecord, Handle, Receiver};
pub use registry::Registry;
pub use slot::{MethodKind, MethodSlot};
