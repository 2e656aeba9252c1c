//! Gauss-Jordan reduction to reduced row echelon form
//!
//! One reducer serves rank, inversion and eigenvector extraction. It works on
//! an owned copy of the rows and is generic over the scalar so the eigen
//! solver can run it with complex arithmetic.

use std::fmt::Debug;
use std::ops::Neg;
use num_complex::Complex64;
use num_traits::Num;
use tracing::{debug, trace};
use linea_core::{StepLog, Value};
use linea_plugin::{FunctionPlugin, FunctionMeta, ArgMeta, EvalContext};
use crate::error::MatrixError;
use crate::types::Matrix;
use crate::helpers::{check_arg_count, extract_matrix};

/// Field the reducer can run over
pub trait Scalar: Copy + Num + Neg<Output = Self> + Debug {
    /// Size used for the pivot test
    fn magnitude(self) -> f64;
}

impl Scalar for f64 {
    fn magnitude(self) -> f64 {
        self.abs()
    }
}

impl Scalar for Complex64 {
    fn magnitude(self) -> f64 {
        self.norm()
    }
}

/// Outcome of a reduction
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction<T> {
    /// Rows in reduced row echelon form
    pub matrix: Vec<Vec<T>>,
    /// Column of each pivot, in row order
    pub pivot_columns: Vec<usize>,
}

impl<T> Reduction<T> {
    pub fn rank(&self) -> usize {
        self.pivot_columns.len()
    }

    /// Columns among the first `cols` that hold no pivot
    pub fn free_columns(&self, cols: usize) -> Vec<usize> {
        (0..cols).filter(|c| !self.pivot_columns.contains(c)).collect()
    }
}

/// Reduce `rows` in place, looking for pivots in the first `scan_cols` columns.
///
/// A candidate counts as a pivot when its magnitude is strictly greater than
/// `tolerance`; with `0.0` that is the exact non-zero test. Pivot rows are
/// scaled so the pivot is exactly one, and eliminated entries are set to
/// exactly zero.
pub fn reduce<T: Scalar>(mut rows: Vec<Vec<T>>, scan_cols: usize, tolerance: f64) -> Reduction<T> {
    let n_rows = rows.len();
    let mut pivot_columns = Vec::new();
    let mut r = 0;

    for col in 0..scan_cols {
        if r >= n_rows {
            break;
        }

        let Some(p) = (r..n_rows).find(|&i| rows[i][col].magnitude() > tolerance) else {
            trace!(col, "no pivot in column");
            continue;
        };
        rows.swap(r, p);

        let pivot = rows[r][col];
        for v in rows[r].iter_mut() {
            *v = *v / pivot;
        }
        rows[r][col] = T::one();

        for i in 0..n_rows {
            if i == r {
                continue;
            }
            let factor = rows[i][col];
            if factor.is_zero() {
                continue;
            }
            for j in 0..rows[i].len() {
                let delta = factor * rows[r][j];
                rows[i][j] = rows[i][j] - delta;
            }
            rows[i][col] = T::zero();
        }

        trace!(row = r, col, "pivot");
        pivot_columns.push(col);
        r += 1;
    }

    Reduction { matrix: rows, pivot_columns }
}

/// Reduced row echelon form of `m`
pub fn rref(m: &Matrix) -> Result<Matrix, MatrixError> {
    m.ensure_finite("matrix")?;
    let reduced = reduce(m.to_rows(), m.cols(), 0.0);
    Ok(Matrix::from_rows_unchecked(reduced.matrix))
}

/// Number of pivots found by Gauss-Jordan elimination
pub fn rank(m: &Matrix) -> Result<usize, MatrixError> {
    m.ensure_finite("matrix")?;
    Ok(reduce(m.to_rows(), m.cols(), 0.0).rank())
}

/// Inverse via reduction of `[M | I]`
pub fn inverse(m: &Matrix) -> Result<Matrix, MatrixError> {
    let n = match m.order() {
        Some(n) => n,
        None => return Err(MatrixError::dims(format!(
            "inverse requires a square matrix, got {}x{}", m.rows(), m.cols()
        ))),
    };
    m.ensure_finite("matrix")?;

    let augmented: Vec<Vec<f64>> = m.as_rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut aug = row.clone();
            aug.extend((0..n).map(|j| if i == j { 1.0 } else { 0.0 }));
            aug
        })
        .collect();

    let reduced = reduce(augmented, n, 0.0);
    if reduced.rank() < n {
        debug!(rank = reduced.rank(), order = n, "singular matrix in inverse");
        return Err(MatrixError::SingularMatrix(
            "matrix is singular and has no inverse".to_string()
        ));
    }

    let data: Vec<Vec<f64>> = reduced.matrix
        .into_iter()
        .map(|row| row[n..].to_vec())
        .collect();
    let inv = Matrix::from_rows_unchecked(data);
    inv.ensure_finite("inverse")?;
    Ok(inv)
}

// ============================================================================
// RANK - Matrix rank
// ============================================================================

pub struct RankFn;

static MATRIX_ARG: [ArgMeta; 1] = [ArgMeta {
    name: "matrix",
    typ: "Matrix",
    description: "Input matrix",
    optional: false,
    default: None,
}];
static RANK_EXAMPLES: [&str; 2] = [
    "rank([[1, 0], [0, 1]]) → 2",
    "rank([[1, 2], [2, 4]]) → 1",
];
static RANK_RELATED: [&str; 2] = ["inverse", "determinant"];

impl FunctionPlugin for RankFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "rank",
            description: "Number of pivots after Gauss-Jordan elimination",
            usage: "rank(matrix)",
            args: &MATRIX_ARG,
            returns: "Number",
            examples: &RANK_EXAMPLES,
            category: "matrix",
            related: &RANK_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_count(args, "rank", 1, 1) {
            return Value::Error(e);
        }

        let matrix = match extract_matrix(&args[0], "rank", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };

        match rank(&matrix) {
            Ok(r) => Value::annotated(
                Value::Number(r as f64),
                &StepLog::single("Calculate rank using Gauss-Jordan elimination."),
                format!("Rank: {}", r),
            ),
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============================================================================
// INVERSE - Matrix inverse
// ============================================================================

pub struct InverseFn;

static INVERSE_EXAMPLES: [&str; 1] = [
    "inverse([[4, 7], [2, 6]]) → [[0.6, -0.7], [-0.2, 0.4]]",
];
static INVERSE_RELATED: [&str; 2] = ["determinant", "solve_inverse"];

impl FunctionPlugin for InverseFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "inverse",
            description: "Inverse of a square matrix by Gauss-Jordan elimination",
            usage: "inverse(matrix)",
            args: &MATRIX_ARG,
            returns: "Matrix",
            examples: &INVERSE_EXAMPLES,
            category: "matrix",
            related: &INVERSE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_count(args, "inverse", 1, 1) {
            return Value::Error(e);
        }

        let matrix = match extract_matrix(&args[0], "inverse", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };

        match inverse(&matrix) {
            Ok(inv) => {
                let text = inv.render_text();
                Value::annotated(
                    inv.to_value(),
                    &StepLog::single("Calculate inverse using Gauss-Jordan elimination on [A | I]."),
                    text,
                )
            }
            Err(e) => Value::Error(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use linea_core::codes;
    use crate::ops::matrix_multiply;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_rank_identity_and_zero() {
        assert_eq!(rank(&Matrix::identity(2).unwrap()).unwrap(), 2);
        assert_eq!(rank(&Matrix::identity(3).unwrap()).unwrap(), 3);
        assert_eq!(rank(&Matrix::zeros(3, 3).unwrap()).unwrap(), 0);
    }

    #[test]
    fn test_rank_proportional_rows() {
        assert_eq!(rank(&m(&[&[1.0, 2.0], &[2.0, 4.0]])).unwrap(), 1);
        assert_eq!(rank(&m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]])).unwrap(), 2);
    }

    #[test]
    fn test_rank_rectangular() {
        let wide = m(&[&[1.0, 0.0, 2.0], &[0.0, 1.0, 3.0]]);
        assert_eq!(rank(&wide).unwrap(), 2);
    }

    #[test]
    fn test_rank_rejects_nan() {
        let bad = m(&[&[1.0, f64::NAN], &[0.0, 1.0]]);
        assert!(matches!(rank(&bad), Err(MatrixError::NumericAnomaly(_))));
    }

    #[test]
    fn test_rref_needs_swap() {
        let r = rref(&m(&[&[0.0, 1.0], &[2.0, 4.0]])).unwrap();
        assert_eq!(r, Matrix::identity(2).unwrap());
    }

    #[test]
    fn test_reduce_reports_free_columns() {
        let reduced = reduce(vec![vec![1.0, 2.0], vec![2.0, 4.0]], 2, 0.0);
        assert_eq!(reduced.pivot_columns, vec![0]);
        assert_eq!(reduced.free_columns(2), vec![1]);
        assert_eq!(reduced.matrix[1], vec![0.0, 0.0]);
    }

    #[test]
    fn test_reduce_complex() {
        let i = Complex64::new(0.0, 1.0);
        let one = Complex64::new(1.0, 0.0);
        // [[-i, -1], [1, -i]] has rank 1
        let reduced = reduce(vec![vec![-i, -one], vec![one, -i]], 2, 1e-12);
        assert_eq!(reduced.rank(), 1);
        assert_abs_diff_eq!(reduced.matrix[0][1].re, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(reduced.matrix[0][1].im, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse() {
        let a = m(&[&[4.0, 7.0], &[2.0, 6.0]]);
        let inv = inverse(&a).unwrap();
        assert_abs_diff_eq!(inv[(0, 0)], 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(inv[(0, 1)], -0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(inv[(1, 0)], -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(inv[(1, 1)], 0.4, epsilon = 1e-12);

        let product = matrix_multiply(&a, &inv).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(product[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_inverse_3x3() {
        let a = m(&[&[2.0, 0.0, 1.0], &[1.0, 3.0, 2.0], &[1.0, 1.0, 1.0]]);
        let inv = inverse(&a).unwrap();
        let product = matrix_multiply(&inv, &a).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(product[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_inverse_singular_and_non_square() {
        let singular = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        assert!(matches!(inverse(&singular), Err(MatrixError::SingularMatrix(_))));

        let wide = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        assert!(matches!(inverse(&wide), Err(MatrixError::DimensionMismatch(_))));
    }

    #[test]
    fn test_rank_fn() {
        let ctx = EvalContext::new();
        let arg = Value::List(vec![Value::from_numbers(&[1.0, 2.0]), Value::from_numbers(&[2.0, 4.0])]);
        let result = RankFn.call(&[arg], &ctx);
        assert_eq!(result.get("result").as_number(), Some(1.0));
        assert_eq!(result.get("text").as_text(), Some("Rank: 1"));
    }

    #[test]
    fn test_inverse_fn_singular() {
        let ctx = EvalContext::new();
        let result = InverseFn.call(&[Matrix::zeros(2, 2).unwrap().to_value()], &ctx);
        assert!(result.as_error().map_or(false, |e| e.is(codes::SINGULAR_MATRIX)));
    }
}
