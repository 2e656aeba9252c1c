//! Engine error taxonomy

use linea_core::LineaError;
use thiserror::Error;

/// Failure of an engine operation, returned at the point of detection
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// Shape or length incompatible with the requested operation
    #[error("{0}")]
    DimensionMismatch(String),

    /// Zero pivot during elimination or inversion
    #[error("{0}")]
    SingularMatrix(String),

    /// Trace or eigen requested outside order 2/3
    #[error("{operation} is only supported for 2x2 and 3x3 matrices, got {rows}x{cols}")]
    UnsupportedSize {
        operation: &'static str,
        rows: usize,
        cols: usize,
    },

    /// Operation undefined for the active dimension
    #[error("{0}")]
    UnsupportedOperation(String),

    /// NaN or infinity in an input or produced by a computation
    #[error("{0}")]
    NumericAnomaly(String),
}

impl MatrixError {
    pub(crate) fn dims(details: impl Into<String>) -> Self {
        MatrixError::DimensionMismatch(details.into())
    }
}

impl From<MatrixError> for LineaError {
    fn from(err: MatrixError) -> Self {
        let message = err.to_string();
        match err {
            MatrixError::DimensionMismatch(_) => LineaError::dimension_mismatch(message),
            MatrixError::SingularMatrix(_) => LineaError::singular_matrix(message),
            MatrixError::UnsupportedSize { .. } => LineaError::unsupported_size(message),
            MatrixError::UnsupportedOperation(_) => LineaError::unsupported_operation(message),
            MatrixError::NumericAnomaly(_) => LineaError::numeric_anomaly(message),
        }
    }
}

/// Reject NaN/infinite values, naming what was being checked
pub(crate) fn ensure_finite<'a, I>(values: I, what: &str) -> Result<(), MatrixError>
where
    I: IntoIterator<Item = &'a f64>,
{
    if values.into_iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(MatrixError::NumericAnomaly(format!("{} contains NaN or infinite entries", what)))
    }
}
