//! Linea Matrix - Small-matrix linear algebra
//!
//! Numeric engine of the calculator:
//! - Matrix algebra (scalar_add, scalar_multiply, mat_add, matmul, transpose)
//! - Row reduction (rank, inverse)
//! - Determinant with a cofactor trace for 2x2 and 3x3
//! - Linear solvers (solve_gaussian, solve_inverse)
//! - Eigenvalues and eigenvectors for 2x2 and 3x3
//! - Vector operations in the active dimension (dot, cross, norm, normalize, project)
//!
//! Every engine function takes its inputs by reference, works on a copy and
//! returns a fresh result. The `*Fn` plugins wrap them for the registry.

mod error;
mod types;
mod helpers;
mod ops;
mod reduce;
mod determinant;
mod solve;
mod eigen;
mod vector_ops;

pub use error::MatrixError;
pub use types::{Matrix, Vector};
pub use helpers::{extract_matrix, extract_vector};
pub use ops::{matrix_add, matrix_multiply, matrix_vector_multiply, scalar_add, scalar_multiply, transpose};
pub use reduce::{inverse, rank, reduce, rref, Reduction, Scalar};
pub use determinant::{determinant, determinant_with_steps, DeterminantTrace};
pub use solve::{solve_by_inverse, solve_gaussian, Solution, SolveMethod, SolveReport};
pub use eigen::{eigen, eigenvalues, render_eigen, Eigenpair, Eigenvalue, Eigenvector};
pub use vector_ops::{cross, dot, norm, normalize, projection, to_3d};

use linea_plugin::PluginRegistry;

/// Load matrix and vector functions into registry
pub fn load_matrix_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Matrix algebra (5 functions)
        .with_function(ops::ScalarAddFn)
        .with_function(ops::ScalarMultiplyFn)
        .with_function(ops::MatAddFn)
        .with_function(ops::MatmulFn)
        .with_function(ops::TransposeFn)

        // Invariants (4 functions)
        .with_function(determinant::DeterminantFn)
        .with_function(reduce::InverseFn)
        .with_function(reduce::RankFn)
        .with_function(eigen::EigenFn)

        // Solvers (2 functions)
        .with_function(solve::SolveGaussianFn)
        .with_function(solve::SolveInverseFn)

        // Vectors (5 functions)
        .with_function(vector_ops::DotFn)
        .with_function(vector_ops::CrossFn)
        .with_function(vector_ops::NormFn)
        .with_function(vector_ops::NormalizeFn)
        .with_function(vector_ops::ProjectFn)
}

/// Registry holding every calculator function
pub fn standard_registry() -> PluginRegistry {
    load_matrix_library(PluginRegistry::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linea_core::{codes, Dimension, Value};
    use linea_plugin::EvalContext;

    #[test]
    fn test_all_functions_registered() {
        let registry = standard_registry();
        let names = registry.function_names();
        for expected in [
            "scalar_add", "scalar_multiply", "mat_add", "matmul", "transpose",
            "determinant", "inverse", "rank", "eigen",
            "solve_gaussian", "solve_inverse",
            "dot", "cross", "norm", "normalize", "project",
        ] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
        assert_eq!(names.len(), 16);
    }

    #[test]
    fn test_dispatch_by_name() {
        let registry = standard_registry();
        let ctx = EvalContext::new();
        let matrix = Value::List(vec![
            Value::from_numbers(&[1.0, 2.0]),
            Value::from_numbers(&[3.0, 4.0]),
        ]);

        let det = registry.call_function("determinant", &[matrix.clone()], &ctx);
        assert_eq!(det.get("result").as_number(), Some(-2.0));

        let rank = registry.call_function("rank", &[matrix], &ctx);
        assert_eq!(rank.get("result").as_number(), Some(2.0));
    }

    #[test]
    fn test_dispatch_respects_dimension() {
        let registry = standard_registry();
        let ctx = EvalContext::new().with_dimension(Dimension::Two);
        let result = registry.call_function(
            "dot",
            &[Value::from_numbers(&[1.0, 2.0, 0.0]), Value::from_numbers(&[3.0, 1.0, 0.0])],
            &ctx,
        );
        assert!(result.as_error().map_or(false, |e| e.is(codes::DIMENSION_MISMATCH)));
    }

    #[test]
    fn test_unknown_function_suggests() {
        let registry = standard_registry();
        let result = registry.call_function("determinent", &[], &EvalContext::new());
        let err = result.as_error().cloned().unwrap();
        assert!(err.is(codes::UNDEFINED_FUNC));
        assert!(err.suggestion.unwrap_or_default().contains("determinant"));
    }
}
