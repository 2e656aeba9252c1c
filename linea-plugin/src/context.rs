//! Evaluation Context

use linea_core::Dimension;

/// Default number of decimals used when rendering result text
pub const DEFAULT_PRECISION: usize = 4;

/// Per-call configuration handed to plugins.
///
/// Holds settings only; plugins never store results here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalContext {
    /// Active vector dimension; vector operands must match it
    pub dimension: Dimension,
    /// Decimals used in rendered result text
    pub precision: usize,
}

impl EvalContext {
    pub fn new() -> Self {
        Self {
            dimension: Dimension::default(),
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
