//! Structured errors for the presentation layer
//!
//! Errors never cross the engine boundary as panics. They are values with a
//! machine-readable code, a human-readable message and an optional hint.

use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
    pub const SINGULAR_MATRIX: &str = "SINGULAR_MATRIX";
    pub const UNSUPPORTED_SIZE: &str = "UNSUPPORTED_SIZE";
    pub const UNSUPPORTED_OPERATION: &str = "UNSUPPORTED_OPERATION";
    pub const NUMERIC_ANOMALY: &str = "NUMERIC_ANOMALY";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const UNDEFINED_FUNC: &str = "UNDEFINED_FUNC";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Structured error: a `(code, message)` pair plus an optional suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineaError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl LineaError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    // ========== Engine Error Constructors ==========

    pub fn dimension_mismatch(details: impl Into<String>) -> Self {
        Self::new(codes::DIMENSION_MISMATCH, format!("Dimension mismatch: {}", details.into()))
    }

    pub fn singular_matrix(details: impl Into<String>) -> Self {
        Self::new(codes::SINGULAR_MATRIX, format!("Singular matrix: {}", details.into()))
            .with_suggestion("The matrix has no inverse; check for dependent rows")
    }

    pub fn unsupported_size(details: impl Into<String>) -> Self {
        Self::new(codes::UNSUPPORTED_SIZE, format!("Unsupported size: {}", details.into()))
            .with_suggestion("Use a 2x2 or 3x3 matrix")
    }

    pub fn unsupported_operation(details: impl Into<String>) -> Self {
        Self::new(codes::UNSUPPORTED_OPERATION, format!("Unsupported operation: {}", details.into()))
    }

    pub fn numeric_anomaly(details: impl Into<String>) -> Self {
        Self::new(codes::NUMERIC_ANOMALY, format!("Numeric anomaly: {}", details.into()))
            .with_suggestion("Check inputs for NaN or infinite entries")
    }

    // ========== Dispatch Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
    }

    pub fn undefined_func(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FUNC, format!("Unknown function: {}", name))
            .with_suggestion("Use list_functions to see what is available")
    }

    pub fn arg_count(func: &str, expected: usize, got: usize) -> Self {
        Self::new(codes::ARG_COUNT,
            format!("{}() expects {} arguments, got {}", func, expected, got))
            .with_suggestion(format!("Use help('{}') for usage", func))
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", func, arg, expected, got))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
    }
}

impl std::fmt::Display for LineaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for LineaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_and_suggestion() {
        let err = LineaError::singular_matrix("zero pivot in column 2");
        let text = err.to_string();
        assert!(text.starts_with("[SINGULAR_MATRIX] Singular matrix: zero pivot in column 2"));
        assert!(text.contains("suggestion:"));
    }

    #[test]
    fn test_serialize_skips_missing_suggestion() {
        let err = LineaError::dimension_mismatch("2x2 vs 3x3");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "DIMENSION_MISMATCH");
        assert!(json.get("suggestion").is_none());
    }

    #[test]
    fn test_is_code() {
        assert!(LineaError::arg_count("rank", 1, 2).is(codes::ARG_COUNT));
        assert!(!LineaError::internal("x").is(codes::ARG_COUNT));
    }
}
