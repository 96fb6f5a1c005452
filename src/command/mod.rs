//! Commands, modules and the message dispatcher.
//!
//! ```text
//! Message → Registry::find (prefix + name/alias, direction) → Binder → Handler
//! ```

mod definition;
mod registry;

pub use definition::{Command, Handler};
pub use registry::{Dispatch, DispatchError, IncomingMessage, Module, Registry};
