//! Linear system solvers
//!
//! Gaussian elimination with partial pivoting, which narrates every swap,
//! elimination and back-substitution, and a solver that goes through the
//! inverse. A singular system is an ordinary outcome here, not an error:
//! both solvers answer `Solution::NoUniqueSolution` and keep whatever steps
//! were produced before the zero pivot showed up.

use serde::{Serialize, Deserialize};
use tracing::{debug, trace};
use linea_core::{format, StepLog, Value};
use linea_plugin::{FunctionPlugin, FunctionMeta, ArgMeta, EvalContext};
use crate::error::{ensure_finite, MatrixError};
use crate::types::{Matrix, Vector};
use crate::ops::matrix_vector_multiply;
use crate::reduce::inverse;
use crate::helpers::{check_arg_count, extract_matrix, extract_vector};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Solution {
    Unique(Vec<f64>),
    NoUniqueSolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveMethod {
    Gaussian,
    Inverse,
}

/// Result of a solve together with its explanation
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub solution: Solution,
    pub steps: StepLog,
    pub method: SolveMethod,
}

impl SolveReport {
    pub fn is_unique(&self) -> bool {
        matches!(self.solution, Solution::Unique(_))
    }

    /// One `x{i} = v` line per unknown, or the singular message
    pub fn render(&self, decimals: usize) -> String {
        match &self.solution {
            Solution::Unique(x) => x
                .iter()
                .enumerate()
                .map(|(i, v)| format!("x{} = {}", i + 1, format::fixed(*v, decimals)))
                .collect::<Vec<_>>()
                .join("\n"),
            Solution::NoUniqueSolution => match self.method {
                SolveMethod::Gaussian => "No unique solution found.".to_string(),
                SolveMethod::Inverse => "Matrix not invertible or no unique solution.".to_string(),
            },
        }
    }

    pub fn to_value(&self, decimals: usize) -> Value {
        let result = match &self.solution {
            Solution::Unique(x) => Value::from_numbers(x),
            Solution::NoUniqueSolution => Value::Null,
        };
        Value::annotated(result, &self.steps, self.render(decimals))
    }
}

fn check_system(a: &Matrix, b: &Vector) -> Result<usize, MatrixError> {
    let n = a.order().ok_or_else(|| MatrixError::dims(format!(
        "coefficient matrix must be square, got {}x{}", a.rows(), a.cols()
    )))?;
    if b.len() != n {
        return Err(MatrixError::dims(format!(
            "right-hand side has length {}, expected {}", b.len(), n
        )));
    }
    a.ensure_finite("coefficient matrix")?;
    b.ensure_finite("right-hand side")?;
    Ok(n)
}

/// Solve `a·x = b` by Gaussian elimination with partial pivoting
pub fn solve_gaussian(a: &Matrix, b: &Vector) -> Result<SolveReport, MatrixError> {
    let n = check_system(a, b)?;
    let mut m = a.to_rows();
    let mut rhs = b.as_slice().to_vec();
    let mut steps = StepLog::new();

    for k in 0..n {
        let mut max_row = k;
        let mut max_val = m[k][k].abs();
        for i in (k + 1)..n {
            if m[i][k].abs() > max_val {
                max_val = m[i][k].abs();
                max_row = i;
            }
        }

        if max_row != k {
            m.swap(k, max_row);
            rhs.swap(k, max_row);
            steps.push(format!("Swap row {} with row {}", k + 1, max_row + 1));
        }

        if m[k][k] == 0.0 {
            debug!(column = k, "zero pivot in gaussian elimination");
            steps.push("No unique solution (zero pivot)");
            return Ok(SolveReport {
                solution: Solution::NoUniqueSolution,
                steps,
                method: SolveMethod::Gaussian,
            });
        }

        for i in (k + 1)..n {
            let factor = m[i][k] / m[k][k];
            steps.push(format!("Eliminate row {} using row {}, factor: {}", i + 1, k + 1, format::fixed(factor, 3)));
            for j in k..n {
                let delta = factor * m[k][j];
                m[i][j] -= delta;
            }
            rhs[i] -= factor * rhs[k];
            trace!(row = i, ?factor, "eliminated");
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let tail: f64 = ((i + 1)..n).map(|j| m[i][j] * x[j]).sum();
        x[i] = (rhs[i] - tail) / m[i][i];
        steps.push(format!("Solve x{} = {}", i + 1, format::fixed(x[i], 3)));
    }

    ensure_finite(&x, "solution")?;
    Ok(SolveReport {
        solution: Solution::Unique(x),
        steps,
        method: SolveMethod::Gaussian,
    })
}

/// Solve `a·x = b` as `x = a⁻¹·b`
pub fn solve_by_inverse(a: &Matrix, b: &Vector) -> Result<SolveReport, MatrixError> {
    check_system(a, b)?;

    let inv = match inverse(a) {
        Ok(inv) => inv,
        Err(MatrixError::SingularMatrix(_)) => {
            return Ok(SolveReport {
                solution: Solution::NoUniqueSolution,
                steps: StepLog::new(),
                method: SolveMethod::Inverse,
            })
        }
        Err(e) => return Err(e),
    };

    let x = matrix_vector_multiply(&inv, b)?;
    x.ensure_finite("solution")?;
    Ok(SolveReport {
        solution: Solution::Unique(x.into_vec()),
        steps: StepLog::single("Solved by matrix inversion."),
        method: SolveMethod::Inverse,
    })
}

static SOLVE_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "A",
        typ: "Matrix",
        description: "Square coefficient matrix",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "b",
        typ: "List",
        description: "Right-hand side, one entry per row of A",
        optional: false,
        default: None,
    },
];

fn call_solver(
    args: &[Value],
    ctx: &EvalContext,
    func: &str,
    solver: fn(&Matrix, &Vector) -> Result<SolveReport, MatrixError>,
) -> Value {
    if let Err(e) = check_arg_count(args, func, 2, 2) {
        return Value::Error(e);
    }

    let a = match extract_matrix(&args[0], func, "A") {
        Ok(m) => m,
        Err(e) => return Value::Error(e),
    };
    let b = match extract_vector(&args[1], func, "b") {
        Ok(v) => v,
        Err(e) => return Value::Error(e),
    };

    match solver(&a, &b) {
        Ok(report) => report.to_value(ctx.precision),
        Err(e) => Value::Error(e.into()),
    }
}

// ============================================================================
// SOLVE_GAUSSIAN - Gaussian elimination with partial pivoting
// ============================================================================

pub struct SolveGaussianFn;

static GAUSS_EXAMPLES: [&str; 1] = [
    "solve_gaussian([[2, 1], [1, 1]], [3, 2]) → [1, 1]",
];
static GAUSS_RELATED: [&str; 2] = ["solve_inverse", "determinant"];

impl FunctionPlugin for SolveGaussianFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "solve_gaussian",
            description: "Solve Ax = b by Gaussian elimination with partial pivoting, step by step",
            usage: "solve_gaussian(A, b)",
            args: &SOLVE_ARGS,
            returns: "List | Null",
            examples: &GAUSS_EXAMPLES,
            category: "solve",
            related: &GAUSS_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        call_solver(args, ctx, "solve_gaussian", solve_gaussian)
    }
}

// ============================================================================
// SOLVE_INVERSE - Solve through the inverse matrix
// ============================================================================

pub struct SolveInverseFn;

static INVERSE_SOLVE_EXAMPLES: [&str; 1] = [
    "solve_inverse([[2, 1], [1, 1]], [3, 2]) → [1, 1]",
];
static INVERSE_SOLVE_RELATED: [&str; 2] = ["solve_gaussian", "inverse"];

impl FunctionPlugin for SolveInverseFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "solve_inverse",
            description: "Solve Ax = b as x = inverse(A) * b",
            usage: "solve_inverse(A, b)",
            args: &SOLVE_ARGS,
            returns: "List | Null",
            examples: &INVERSE_SOLVE_EXAMPLES,
            category: "solve",
            related: &INVERSE_SOLVE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        call_solver(args, ctx, "solve_inverse", solve_by_inverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use linea_core::codes;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn unique(report: &SolveReport) -> &[f64] {
        match &report.solution {
            Solution::Unique(x) => x,
            Solution::NoUniqueSolution => panic!("expected a unique solution"),
        }
    }

    #[test]
    fn test_gaussian_two_by_two_trace() {
        let a = m(&[&[2.0, 1.0], &[1.0, 1.0]]);
        let report = solve_gaussian(&a, &Vector::new(vec![3.0, 2.0])).unwrap();

        assert_eq!(
            report.steps.as_slice(),
            &[
                "Eliminate row 2 using row 1, factor: 0.500",
                "Solve x2 = 1.000",
                "Solve x1 = 1.000",
            ]
        );
        assert_eq!(unique(&report), &[1.0, 1.0]);
        assert_eq!(report.render(4), "x1 = 1.0000\nx2 = 1.0000");
    }

    #[test]
    fn test_gaussian_trace_has_no_negative_zero() {
        let a = m(&[&[-2.0, 0.0], &[0.0, 1.0]]);
        let report = solve_gaussian(&a, &Vector::new(vec![0.0, 0.0])).unwrap();
        assert_eq!(
            report.steps.as_slice(),
            &[
                "Eliminate row 2 using row 1, factor: 0.000",
                "Solve x2 = 0.000",
                "Solve x1 = 0.000",
            ]
        );
    }

    #[test]
    fn test_gaussian_swaps_rows() {
        let a = m(&[&[1.0, 1.0], &[3.0, 1.0]]);
        let report = solve_gaussian(&a, &Vector::new(vec![3.0, 5.0])).unwrap();
        assert_eq!(report.steps.as_slice()[0], "Swap row 1 with row 2");
        let x = unique(&report);
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gaussian_singular_keeps_partial_steps() {
        let a = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        let report = solve_gaussian(&a, &Vector::new(vec![3.0, 6.0])).unwrap();

        assert_eq!(report.solution, Solution::NoUniqueSolution);
        assert_eq!(
            report.steps.as_slice(),
            &[
                "Swap row 1 with row 2",
                "Eliminate row 2 using row 1, factor: 0.500",
                "No unique solution (zero pivot)",
            ]
        );
        assert_eq!(report.render(4), "No unique solution found.");
    }

    #[test]
    fn test_inverse_solver() {
        let a = m(&[&[2.0, 1.0], &[1.0, 1.0]]);
        let report = solve_by_inverse(&a, &Vector::new(vec![3.0, 2.0])).unwrap();
        assert_eq!(report.steps.as_slice(), &["Solved by matrix inversion."]);
        let x = unique(&report);
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 1.0, epsilon = 1e-12);

        let singular = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        let report = solve_by_inverse(&singular, &Vector::new(vec![1.0, 1.0])).unwrap();
        assert_eq!(report.solution, Solution::NoUniqueSolution);
        assert!(report.steps.is_empty());
        assert_eq!(report.render(4), "Matrix not invertible or no unique solution.");
    }

    #[test]
    fn test_methods_agree() {
        let a = m(&[&[4.0, -2.0, 1.0], &[3.0, 6.0, -4.0], &[2.0, 1.0, 8.0]]);
        let b = Vector::new(vec![12.0, -25.0, 32.0]);
        let gauss = solve_gaussian(&a, &b).unwrap();
        let inv = solve_by_inverse(&a, &b).unwrap();
        for (g, i) in unique(&gauss).iter().zip(unique(&inv)) {
            assert_abs_diff_eq!(*g, *i, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_shape_errors() {
        let a = m(&[&[1.0, 0.0], &[0.0, 1.0]]);
        assert!(matches!(
            solve_gaussian(&a, &Vector::new(vec![1.0, 2.0, 3.0])),
            Err(MatrixError::DimensionMismatch(_))
        ));

        let wide = m(&[&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]]);
        assert!(matches!(
            solve_by_inverse(&wide, &Vector::new(vec![1.0, 2.0])),
            Err(MatrixError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_solve_fn_values() {
        let ctx = EvalContext::new();
        let a = m(&[&[2.0, 1.0], &[1.0, 1.0]]).to_value();
        let b = Value::from_numbers(&[3.0, 2.0]);

        let result = SolveGaussianFn.call(&[a.clone(), b.clone()], &ctx);
        assert_eq!(result.get("result"), Value::from_numbers(&[1.0, 1.0]));
        assert_eq!(result.get("text").as_text(), Some("x1 = 1.0000\nx2 = 1.0000"));

        let singular = m(&[&[0.0, 0.0], &[0.0, 0.0]]).to_value();
        let result = SolveInverseFn.call(&[singular, b], &ctx);
        assert!(result.get("result").is_null());

        let err = SolveGaussianFn.call(&[a], &ctx);
        assert!(err.as_error().map_or(false, |e| e.is(codes::ARG_COUNT)));
    }
}
