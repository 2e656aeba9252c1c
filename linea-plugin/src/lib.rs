//! Linea Plugin System
//!
//! Every calculator operation is a `FunctionPlugin` registered by name in a
//! `PluginRegistry`. Callers pick an operation by name, pass `Value`
//! arguments and an `EvalContext`, and get a `Value` back.

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::{EvalContext, DEFAULT_PRECISION};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, EvalContext};
    pub use linea_core::prelude::*;
}
