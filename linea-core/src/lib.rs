//! Linea Core - Fundamental types
//!
//! This crate provides the core types used throughout Linea:
//! - `Value`: Runtime values (numbers, text, objects, errors)
//! - `LineaError`: Structured errors for the presentation layer
//! - `StepLog`: Ordered explanation traces
//! - `Dimension`: Active vector dimension (2 or 3)
//! - `format`: Number rendering for traces and result text

mod dimension;
mod error;
mod step;
mod value;
pub mod format;

pub use dimension::{Dimension, ParseDimensionError};
pub use error::{LineaError, codes};
pub use step::StepLog;
pub use value::Value;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Dimension, LineaError, StepLog, Value};
    pub use crate::error::codes;
}
