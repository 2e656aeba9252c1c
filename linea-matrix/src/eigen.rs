//! Eigenvalues and eigenvectors of 2x2 and 3x3 matrices
//!
//! Eigenvalues are the roots of the characteristic polynomial, found in
//! closed form. Each eigenvector is read off the reduced row echelon form of
//! `A - λI`, using complex arithmetic when λ is complex.

use std::collections::HashMap;
use std::f64::consts::PI;
use num_complex::Complex64;
use serde::{Serialize, Deserialize};
use tracing::{debug, trace};
use linea_core::{format, StepLog, Value};
use linea_plugin::{FunctionPlugin, FunctionMeta, ArgMeta, EvalContext};
use crate::error::{ensure_finite, MatrixError};
use crate::types::Matrix;
use crate::reduce::{reduce, Scalar};
use crate::helpers::{check_arg_count, extract_matrix};

/// Relative tolerance on the cubic discriminant
const DISCRIMINANT_TOLERANCE: f64 = 1e-10;
/// Pivot tolerance for null-space extraction, relative to the matrix scale
const NULL_SPACE_TOLERANCE: f64 = 1e-8;
/// Eigenvalues closer than this (relative) count as repeats
const REPEAT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Eigenvalue {
    Real(f64),
    Complex(Complex64),
}

impl Eigenvalue {
    pub fn is_real(&self) -> bool {
        matches!(self, Eigenvalue::Real(_))
    }

    pub fn to_complex(self) -> Complex64 {
        match self {
            Eigenvalue::Real(x) => Complex64::new(x, 0.0),
            Eigenvalue::Complex(z) => z,
        }
    }

    /// `2.0000` or `1.0000+2.0000i`
    pub fn render(&self, decimals: usize) -> String {
        match self {
            Eigenvalue::Real(x) => format::fixed(*x, decimals),
            Eigenvalue::Complex(z) => format::complex(z.re, z.im, decimals),
        }
    }

    fn to_value(self) -> Value {
        match self {
            Eigenvalue::Real(x) => Value::Number(x),
            Eigenvalue::Complex(z) => complex_to_value(z),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Eigenvector {
    Real(Vec<f64>),
    Complex(Vec<Complex64>),
}

impl Eigenvector {
    pub fn len(&self) -> usize {
        match self {
            Eigenvector::Real(v) => v.len(),
            Eigenvector::Complex(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_complex(&self) -> Vec<Complex64> {
        match self {
            Eigenvector::Real(v) => v.iter().map(|&x| Complex64::new(x, 0.0)).collect(),
            Eigenvector::Complex(v) => v.clone(),
        }
    }

    /// Entries joined by `, `
    pub fn render(&self, decimals: usize) -> String {
        let parts: Vec<String> = match self {
            Eigenvector::Real(v) => v.iter().map(|&x| format::fixed(x, decimals)).collect(),
            Eigenvector::Complex(v) => v.iter().map(|z| format::complex(z.re, z.im, decimals)).collect(),
        };
        parts.join(", ")
    }

    fn to_value(&self) -> Value {
        match self {
            Eigenvector::Real(v) => Value::from_numbers(v),
            Eigenvector::Complex(v) => Value::List(v.iter().map(|&z| complex_to_value(z)).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eigenpair {
    pub value: Eigenvalue,
    pub vector: Eigenvector,
}

fn complex_to_value(z: Complex64) -> Value {
    let mut obj = HashMap::new();
    obj.insert("re".to_string(), Value::Number(z.re));
    obj.insert("im".to_string(), Value::Number(z.im));
    Value::Object(obj)
}

fn eigen_order(m: &Matrix) -> Result<usize, MatrixError> {
    let n = m.order().ok_or_else(|| MatrixError::dims(format!(
        "eigen decomposition requires a square matrix, got {}x{}", m.rows(), m.cols()
    )))?;
    if n != 2 && n != 3 {
        return Err(MatrixError::UnsupportedSize { operation: "eigen decomposition", rows: n, cols: n });
    }
    m.ensure_finite("matrix")?;
    Ok(n)
}

/// Eigenvalues, real ones ascending, then conjugate pairs with `+im` first
pub fn eigenvalues(m: &Matrix) -> Result<Vec<Eigenvalue>, MatrixError> {
    let n = eigen_order(m)?;
    let mut values = if n == 2 { quadratic_roots(m) } else { cubic_roots(m) };

    for v in &values {
        let z = v.to_complex();
        ensure_finite(&[z.re, z.im], "eigenvalues")?;
    }

    values.sort_by(|x, y| match (x, y) {
        (Eigenvalue::Real(a), Eigenvalue::Real(b)) => a.total_cmp(b),
        (Eigenvalue::Real(_), Eigenvalue::Complex(_)) => std::cmp::Ordering::Less,
        (Eigenvalue::Complex(_), Eigenvalue::Real(_)) => std::cmp::Ordering::Greater,
        (Eigenvalue::Complex(a), Eigenvalue::Complex(b)) => {
            a.re.total_cmp(&b.re).then(b.im.total_cmp(&a.im))
        }
    });
    Ok(values)
}

/// Roots of `λ² - tr·λ + det`
fn quadratic_roots(m: &Matrix) -> Vec<Eigenvalue> {
    let tr = m[(0, 0)] + m[(1, 1)];
    let det = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];
    let disc = tr * tr - 4.0 * det;
    trace!(tr, det, disc, "characteristic quadratic");

    if disc >= 0.0 {
        let s = disc.sqrt();
        vec![Eigenvalue::Real((tr - s) / 2.0), Eigenvalue::Real((tr + s) / 2.0)]
    } else {
        let re = tr / 2.0;
        let im = (-disc).sqrt() / 2.0;
        vec![
            Eigenvalue::Complex(Complex64::new(re, im)),
            Eigenvalue::Complex(Complex64::new(re, -im)),
        ]
    }
}

/// Roots of `λ³ - tr·λ² + c₂·λ - det`
fn cubic_roots(m: &Matrix) -> Vec<Eigenvalue> {
    let tr = m[(0, 0)] + m[(1, 1)] + m[(2, 2)];
    let c2 = (m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)])
        + (m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)])
        + (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)]);
    let det = m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)]);

    // Monic λ³ + aλ² + bλ + c, depressed by λ = t - a/3 to t³ + pt + q
    let (a, b, c) = (-tr, c2, -det);
    let shift = a / 3.0;
    let p = b - a * a / 3.0;
    let q = 2.0 * a * a * a / 27.0 - a * b / 3.0 + c;
    let half_q = q / 2.0;
    let third_p = p / 3.0;
    let disc = half_q * half_q + third_p * third_p * third_p;
    let tol = DISCRIMINANT_TOLERANCE * (third_p.abs().powi(3) + half_q * half_q);
    trace!(p, q, disc, "depressed cubic");

    if disc > tol {
        // One real root and a conjugate pair
        let sq = disc.sqrt();
        let u = (-half_q + sq).cbrt();
        let v = (-half_q - sq).cbrt();
        let re = -(u + v) / 2.0 - shift;
        let im = (u - v) * 3f64.sqrt() / 2.0;
        return vec![
            Eigenvalue::Real(u + v - shift),
            Eigenvalue::Complex(Complex64::new(re, im)),
            Eigenvalue::Complex(Complex64::new(re, -im)),
        ];
    }

    let roots = if disc >= -tol {
        if p >= 0.0 {
            [0.0; 3]
        } else {
            // Double root
            let single = 3.0 * q / p;
            let double = -3.0 * q / (2.0 * p);
            [single, double, double]
        }
    } else {
        let r = 2.0 * (-third_p).sqrt();
        let arg = ((3.0 * q) / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let phi = arg.acos() / 3.0;
        [
            r * phi.cos(),
            r * (phi - 2.0 * PI / 3.0).cos(),
            r * (phi - 4.0 * PI / 3.0).cos(),
        ]
    };

    roots.iter().map(|t| Eigenvalue::Real(t - shift)).collect()
}

/// Null-space vector of `A - λI` taken from its `k`-th free column
fn null_vector<T: Scalar>(shifted: Vec<Vec<T>>, k: usize, tolerance: f64) -> Option<Vec<T>> {
    let n = shifted.len();
    let reduced = reduce(shifted, n, tolerance);
    let free = reduced.free_columns(n);
    let column = *free.get(k).or_else(|| free.last())?;

    let mut v = vec![T::zero(); n];
    v[column] = T::one();
    for (row, &pivot_col) in reduced.pivot_columns.iter().enumerate() {
        v[pivot_col] = -reduced.matrix[row][column];
    }
    Some(v)
}

fn eigenvector(m: &Matrix, value: Eigenvalue, repeat: usize, tolerance: f64) -> Result<Eigenvector, MatrixError> {
    let n = m.rows();
    let vector = match value {
        Eigenvalue::Real(lambda) => {
            let shifted: Vec<Vec<f64>> = (0..n)
                .map(|i| (0..n).map(|j| m[(i, j)] - if i == j { lambda } else { 0.0 }).collect())
                .collect();
            null_vector(shifted, repeat, tolerance).map(Eigenvector::Real)
        }
        Eigenvalue::Complex(lambda) => {
            let shifted: Vec<Vec<Complex64>> = (0..n)
                .map(|i| {
                    (0..n)
                        .map(|j| {
                            let entry = Complex64::new(m[(i, j)], 0.0);
                            if i == j { entry - lambda } else { entry }
                        })
                        .collect()
                })
                .collect();
            null_vector(shifted, repeat, tolerance).map(Eigenvector::Complex)
        }
    };

    vector.ok_or_else(|| {
        debug!(eigenvalue = %value.render(6), "empty null space");
        MatrixError::NumericAnomaly(format!(
            "no eigenvector found for eigenvalue {}", value.render(4)
        ))
    })
}

/// Eigenpairs of a 2x2 or 3x3 matrix, ordered like `eigenvalues`.
///
/// Vectors are not normalized: one free variable is set to one and the
/// pivot variables follow from it. Repeated eigenvalues take successive
/// free columns, so a multi-dimensional null space yields independent
/// vectors.
pub fn eigen(m: &Matrix) -> Result<Vec<Eigenpair>, MatrixError> {
    let values = eigenvalues(m)?;
    let scale = match m.iter().fold(0.0f64, |acc, x| acc.max(x.abs())) {
        s if s > 0.0 => s,
        _ => 1.0,
    };
    let tolerance = NULL_SPACE_TOLERANCE * scale;

    let mut pairs: Vec<Eigenpair> = Vec::with_capacity(values.len());
    for value in values {
        let lambda = value.to_complex();
        let repeat = pairs
            .iter()
            .filter(|p| (p.value.to_complex() - lambda).norm() <= REPEAT_TOLERANCE * scale)
            .count();
        let vector = eigenvector(m, value, repeat, tolerance)?;
        pairs.push(Eigenpair { value, vector });
    }

    Ok(pairs)
}

/// Eigenvalues on one line, then one eigenvector per line
pub fn render_eigen(pairs: &[Eigenpair], decimals: usize) -> String {
    let values: Vec<String> = pairs.iter().map(|p| p.value.render(decimals)).collect();
    let vectors: Vec<String> = pairs.iter().map(|p| p.vector.render(decimals)).collect();
    format!(
        "Eigenvalues:\n{}\n\nEigenvectors (column vectors):\n{}",
        values.join(", "),
        vectors.join("\n")
    )
}

fn eigen_to_value(pairs: &[Eigenpair]) -> Value {
    let mut obj = HashMap::new();
    obj.insert("type".to_string(), Value::Text("Eigen".to_string()));
    obj.insert(
        "values".to_string(),
        Value::List(pairs.iter().map(|p| p.value.to_value()).collect()),
    );
    obj.insert(
        "vectors".to_string(),
        Value::List(pairs.iter().map(|p| p.vector.to_value()).collect()),
    );
    Value::Object(obj)
}

// ============================================================================
// EIGEN - Eigenvalues and eigenvectors
// ============================================================================

pub struct EigenFn;

static EIGEN_ARGS: [ArgMeta; 1] = [ArgMeta {
    name: "matrix",
    typ: "Matrix",
    description: "Square 2x2 or 3x3 matrix",
    optional: false,
    default: None,
}];
static EIGEN_EXAMPLES: [&str; 2] = [
    "eigen([[2, 0], [0, 3]]) → values [2, 3]",
    "eigen([[0, -1], [1, 0]]) → values [i, -i]",
];
static EIGEN_RELATED: [&str; 2] = ["determinant", "rank"];

impl FunctionPlugin for EigenFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "eigen",
            description: "Eigenvalues and eigenvectors of a 2x2 or 3x3 matrix",
            usage: "eigen(matrix)",
            args: &EIGEN_ARGS,
            returns: "Object",
            examples: &EIGEN_EXAMPLES,
            category: "matrix",
            related: &EIGEN_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_count(args, "eigen", 1, 1) {
            return Value::Error(e);
        }

        let matrix = match extract_matrix(&args[0], "eigen", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };

        match eigen(&matrix) {
            Ok(pairs) => Value::annotated(
                eigen_to_value(&pairs),
                &StepLog::single(
                    "Calculate eigenvalues from the characteristic polynomial and eigenvectors from the null space of (A - λI).",
                ),
                render_eigen(&pairs, ctx.precision),
            ),
            Err(e) => Value::Error(e.into()),
        }
    }
}
