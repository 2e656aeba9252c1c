//! Elementwise and linear matrix algebra

use linea_core::{format, StepLog, Value};
use linea_plugin::{FunctionPlugin, FunctionMeta, ArgMeta, EvalContext};
use crate::error::{ensure_finite, MatrixError};
use crate::types::{Matrix, Vector};
use crate::helpers::{check_arg_count, extract_matrix, extract_number};

/// Add `s` to every entry
pub fn scalar_add(m: &Matrix, s: f64) -> Result<Matrix, MatrixError> {
    map_entries(m, s, |v| v + s)
}

/// Multiply every entry by `s`
pub fn scalar_multiply(m: &Matrix, s: f64) -> Result<Matrix, MatrixError> {
    map_entries(m, s, |v| v * s)
}

fn map_entries(m: &Matrix, s: f64, f: impl Fn(f64) -> f64) -> Result<Matrix, MatrixError> {
    m.ensure_finite("matrix")?;
    ensure_finite(&[s], "scalar")?;

    let data = m.as_rows()
        .iter()
        .map(|row| row.iter().map(|&v| f(v)).collect())
        .collect();
    finite_result(Matrix::from_rows_unchecked(data))
}

fn finite_result(m: Matrix) -> Result<Matrix, MatrixError> {
    m.ensure_finite("result")?;
    Ok(m)
}

/// Elementwise sum; shapes must match
pub fn matrix_add(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    if a.rows() != b.rows() || a.cols() != b.cols() {
        return Err(MatrixError::dims(format!(
            "matrices must have same dimensions: {}x{} vs {}x{}",
            a.rows(), a.cols(), b.rows(), b.cols()
        )));
    }
    a.ensure_finite("matrix A")?;
    b.ensure_finite("matrix B")?;

    let data = a.as_rows()
        .iter()
        .zip(b.as_rows())
        .map(|(ra, rb)| ra.iter().zip(rb).map(|(x, y)| x + y).collect())
        .collect();
    finite_result(Matrix::from_rows_unchecked(data))
}

/// Standard product; `a.cols` must equal `b.rows`
pub fn matrix_multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    if a.cols() != b.rows() {
        return Err(MatrixError::dims(format!(
            "incompatible dimensions {}x{} and {}x{}",
            a.rows(), a.cols(), b.rows(), b.cols()
        )));
    }
    a.ensure_finite("matrix A")?;
    b.ensure_finite("matrix B")?;

    let mut data = vec![vec![0.0; b.cols()]; a.rows()];
    for (i, out_row) in data.iter_mut().enumerate() {
        for (j, out) in out_row.iter_mut().enumerate() {
            *out = (0..a.cols()).map(|k| a[(i, k)] * b[(k, j)]).sum();
        }
    }
    finite_result(Matrix::from_rows_unchecked(data))
}

/// `m · v`; `m.cols` must equal `v.len()`
pub fn matrix_vector_multiply(m: &Matrix, v: &Vector) -> Result<Vector, MatrixError> {
    if m.cols() != v.len() {
        return Err(MatrixError::dims(format!(
            "cannot multiply {}x{} matrix by vector of length {}",
            m.rows(), m.cols(), v.len()
        )));
    }
    m.ensure_finite("matrix")?;
    v.ensure_finite("vector")?;

    let data = m.as_rows()
        .iter()
        .map(|row| row.iter().zip(v.as_slice()).map(|(x, y)| x * y).sum())
        .collect();
    let product = Vector::new(data);
    product.ensure_finite("product")?;
    Ok(product)
}

pub fn transpose(m: &Matrix) -> Result<Matrix, MatrixError> {
    m.ensure_finite("matrix")?;
    let data = (0..m.cols())
        .map(|j| (0..m.rows()).map(|i| m[(i, j)]).collect())
        .collect();
    Ok(Matrix::from_rows_unchecked(data))
}

fn matrix_result(m: Matrix, steps: StepLog) -> Value {
    let text = m.render_text();
    Value::annotated(m.to_value(), &steps, text)
}

// ============================================================================
// SCALAR_ADD - Add a scalar to every entry
// ============================================================================

pub struct ScalarAddFn;

static SCALAR_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "matrix",
        typ: "Matrix",
        description: "Matrix to transform",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "scalar",
        typ: "Number",
        description: "Scalar applied to every entry",
        optional: false,
        default: None,
    },
];
static SCALAR_ADD_EXAMPLES: [&str; 1] = [
    "scalar_add([[1, 2], [3, 4]], 1) → [[2, 3], [4, 5]]",
];
static SCALAR_ADD_RELATED: [&str; 2] = ["scalar_multiply", "mat_add"];

impl FunctionPlugin for ScalarAddFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "scalar_add",
            description: "Add a scalar to each element of a matrix",
            usage: "scalar_add(matrix, scalar)",
            args: &SCALAR_ARGS,
            returns: "Matrix",
            examples: &SCALAR_ADD_EXAMPLES,
            category: "matrix",
            related: &SCALAR_ADD_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_count(args, "scalar_add", 2, 2) {
            return Value::Error(e);
        }

        let matrix = match extract_matrix(&args[0], "scalar_add", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };
        let scalar = match extract_number(&args[1], "scalar_add", "scalar") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        match scalar_add(&matrix, scalar) {
            Ok(m) => {
                let steps = StepLog::single(format!("Adding scalar {} to each element.", format::plain(scalar)));
                matrix_result(m, steps)
            }
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============================================================================
// SCALAR_MULTIPLY - Multiply every entry by a scalar
// ============================================================================

pub struct ScalarMultiplyFn;

static SCALAR_MUL_EXAMPLES: [&str; 1] = [
    "scalar_multiply([[1, 2], [3, 4]], 2) → [[2, 4], [6, 8]]",
];
static SCALAR_MUL_RELATED: [&str; 2] = ["scalar_add", "matmul"];

impl FunctionPlugin for ScalarMultiplyFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "scalar_multiply",
            description: "Multiply each element of a matrix by a scalar",
            usage: "scalar_multiply(matrix, scalar)",
            args: &SCALAR_ARGS,
            returns: "Matrix",
            examples: &SCALAR_MUL_EXAMPLES,
            category: "matrix",
            related: &SCALAR_MUL_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_count(args, "scalar_multiply", 2, 2) {
            return Value::Error(e);
        }

        let matrix = match extract_matrix(&args[0], "scalar_multiply", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };
        let scalar = match extract_number(&args[1], "scalar_multiply", "scalar") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        match scalar_multiply(&matrix, scalar) {
            Ok(m) => {
                let steps = StepLog::single(format!("Multiply matrix by scalar {}.", format::plain(scalar)));
                matrix_result(m, steps)
            }
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============================================================================
// MAT_ADD - Matrix addition
// ============================================================================

pub struct MatAddFn;

static TWO_MATRIX_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "a",
        typ: "Matrix",
        description: "Left operand",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "b",
        typ: "Matrix",
        description: "Right operand",
        optional: false,
        default: None,
    },
];
static MAT_ADD_EXAMPLES: [&str; 1] = [
    "mat_add([[1, 2], [3, 4]], [[5, 6], [7, 8]]) → [[6, 8], [10, 12]]",
];
static MAT_ADD_RELATED: [&str; 2] = ["matmul", "scalar_add"];

impl FunctionPlugin for MatAddFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "mat_add",
            description: "Element-wise sum of two matrices with the same shape",
            usage: "mat_add(a, b)",
            args: &TWO_MATRIX_ARGS,
            returns: "Matrix",
            examples: &MAT_ADD_EXAMPLES,
            category: "matrix",
            related: &MAT_ADD_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_count(args, "mat_add", 2, 2) {
            return Value::Error(e);
        }

        let a = match extract_matrix(&args[0], "mat_add", "a") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };
        let b = match extract_matrix(&args[1], "mat_add", "b") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };

        match matrix_add(&a, &b) {
            Ok(sum) => matrix_result(sum, StepLog::single("Add matrix B to matrix A elementwise.")),
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============================================================================
// MATMUL - Matrix multiplication
// ============================================================================

pub struct MatmulFn;

static MATMUL_EXAMPLES: [&str; 1] = [
    "matmul([[1, 2], [3, 4]], [[5, 6], [7, 8]]) → [[19, 22], [43, 50]]",
];
static MATMUL_RELATED: [&str; 2] = ["mat_add", "transpose"];

impl FunctionPlugin for MatmulFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "matmul",
            description: "Matrix product A × B (A's columns must equal B's rows)",
            usage: "matmul(a, b)",
            args: &TWO_MATRIX_ARGS,
            returns: "Matrix",
            examples: &MATMUL_EXAMPLES,
            category: "matrix",
            related: &MATMUL_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_count(args, "matmul", 2, 2) {
            return Value::Error(e);
        }

        let a = match extract_matrix(&args[0], "matmul", "a") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };
        let b = match extract_matrix(&args[1], "matmul", "b") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };

        match matrix_multiply(&a, &b) {
            Ok(product) => matrix_result(product, StepLog::single("Multiply matrix A by matrix B.")),
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============================================================================
// TRANSPOSE - Swap rows and columns
// ============================================================================

pub struct TransposeFn;

static TRANSPOSE_ARGS: [ArgMeta; 1] = [ArgMeta {
    name: "matrix",
    typ: "Matrix",
    description: "Matrix to transpose",
    optional: false,
    default: None,
}];
static TRANSPOSE_EXAMPLES: [&str; 1] = [
    "transpose([[1, 2, 3], [4, 5, 6]]) → [[1, 4], [2, 5], [3, 6]]",
];
static TRANSPOSE_RELATED: [&str; 1] = ["matmul"];

impl FunctionPlugin for TransposeFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "transpose",
            description: "Transpose a matrix (swap rows and columns)",
            usage: "transpose(matrix)",
            args: &TRANSPOSE_ARGS,
            returns: "Matrix",
            examples: &TRANSPOSE_EXAMPLES,
            category: "matrix",
            related: &TRANSPOSE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_count(args, "transpose", 1, 1) {
            return Value::Error(e);
        }

        let matrix = match extract_matrix(&args[0], "transpose", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };

        match transpose(&matrix) {
            Ok(t) => matrix_result(t, StepLog::single("Transpose the matrix.")),
            Err(e) => Value::Error(e.into()),
        }
    }
}
