//! Determinant with a cofactor-expansion trace for orders 2 and 3

use tracing::debug;
use linea_core::{format, StepLog, Value};
use linea_plugin::{FunctionPlugin, FunctionMeta, ArgMeta, EvalContext};
use crate::error::{ensure_finite, MatrixError};
use crate::types::Matrix;
use crate::helpers::{check_arg_count, extract_matrix};

/// Determinant value together with the lines that derive it
#[derive(Debug, Clone, PartialEq)]
pub struct DeterminantTrace {
    pub value: f64,
    pub steps: StepLog,
}

fn square_order(m: &Matrix, operation: &str) -> Result<usize, MatrixError> {
    m.order().ok_or_else(|| MatrixError::dims(format!(
        "{} requires a square matrix, got {}x{}", operation, m.rows(), m.cols()
    )))
}

/// Closed-form determinant of a 2x2 or 3x3 matrix, with its derivation
pub fn determinant_with_steps(m: &Matrix) -> Result<DeterminantTrace, MatrixError> {
    let n = square_order(m, "determinant")?;
    m.ensure_finite("matrix")?;

    let p = format::plain;
    let mut steps = StepLog::new();

    let value = match n {
        2 => {
            let (a, b, c, d) = (m[(0, 0)], m[(0, 1)], m[(1, 0)], m[(1, 1)]);
            let ad = a * d;
            let bc = b * c;
            let det = ad - bc;

            steps.push("det(A) = ad - bc");
            steps.push(format!("= {}*{} - {}*{}", p(a), p(d), p(b), p(c)));
            steps.push(format!("= {} - {}", p(ad), p(bc)));
            steps.push(format!("= {}", p(det)));
            det
        }
        3 => {
            let (a, b, c) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
            let (d, e, f) = (m[(1, 0)], m[(1, 1)], m[(1, 2)]);
            let (g, h, i) = (m[(2, 0)], m[(2, 1)], m[(2, 2)]);

            let minor_a = e * i - f * h;
            let minor_b = d * i - f * g;
            let minor_c = d * h - e * g;
            let (term_a, term_b, term_c) = (a * minor_a, b * minor_b, c * minor_c);
            let det = term_a - term_b + term_c;

            steps.push("det(A) = a(ei − fh) − b(di − fg) + c(dh − eg)");
            steps.push(format!(
                "= {}({}*{} - {}*{}) - {}({}*{} - {}*{}) + {}({}*{} - {}*{})",
                p(a), p(e), p(i), p(f), p(h),
                p(b), p(d), p(i), p(f), p(g),
                p(c), p(d), p(h), p(e), p(g),
            ));
            steps.push(format!(
                "= {}({}) - {}({}) + {}({})",
                p(a), p(minor_a), p(b), p(minor_b), p(c), p(minor_c)
            ));
            steps.push(format!("= {} - {} + {}", p(term_a), p(term_b), p(term_c)));
            steps.push(format!("= {}", p(det)));
            det
        }
        _ => {
            return Err(MatrixError::UnsupportedSize {
                operation: "determinant trace",
                rows: m.rows(),
                cols: m.cols(),
            })
        }
    };

    ensure_finite(&[value], "determinant")?;
    Ok(DeterminantTrace { value, steps })
}

/// Determinant of any square matrix
pub fn determinant(m: &Matrix) -> Result<f64, MatrixError> {
    let n = square_order(m, "determinant")?;
    m.ensure_finite("matrix")?;

    let value = match n {
        1 => m[(0, 0)],
        2 | 3 => determinant_with_steps(m)?.value,
        _ => eliminate(m.to_rows()),
    };

    ensure_finite(&[value], "determinant")?;
    Ok(value)
}

/// Product of the pivots after elimination with partial pivoting
fn eliminate(mut rows: Vec<Vec<f64>>) -> f64 {
    let n = rows.len();
    let mut det = 1.0;

    for k in 0..n {
        let mut p = k;
        for i in (k + 1)..n {
            if rows[i][k].abs() > rows[p][k].abs() {
                p = i;
            }
        }
        if rows[p][k] == 0.0 {
            return 0.0;
        }
        if p != k {
            rows.swap(p, k);
            det = -det;
        }

        let pivot = rows[k][k];
        det *= pivot;
        for i in (k + 1)..n {
            let factor = rows[i][k] / pivot;
            for j in k..n {
                let delta = factor * rows[k][j];
                rows[i][j] -= delta;
            }
        }
    }

    det
}

// ============================================================================
// DETERMINANT - Determinant with step-by-step expansion
// ============================================================================

pub struct DeterminantFn;

static DET_ARGS: [ArgMeta; 1] = [ArgMeta {
    name: "matrix",
    typ: "Matrix",
    description: "Square matrix",
    optional: false,
    default: None,
}];
static DET_EXAMPLES: [&str; 2] = [
    "determinant([[1, 0], [0, 1]]) → 1",
    "determinant([[1, 2], [3, 4]]) → -2",
];
static DET_RELATED: [&str; 2] = ["inverse", "rank"];

impl FunctionPlugin for DeterminantFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "determinant",
            description: "Determinant of a square matrix, expanded step by step for 2x2 and 3x3",
            usage: "determinant(matrix)",
            args: &DET_ARGS,
            returns: "Number",
            examples: &DET_EXAMPLES,
            category: "matrix",
            related: &DET_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_count(args, "determinant", 1, 1) {
            return Value::Error(e);
        }

        let matrix = match extract_matrix(&args[0], "determinant", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };

        let outcome = match matrix.order() {
            Some(2) | Some(3) => determinant_with_steps(&matrix),
            _ => determinant(&matrix).map(|value| {
                debug!(rows = matrix.rows(), "determinant without trace");
                DeterminantTrace {
                    value,
                    steps: StepLog::single("Step-by-step for determinant only implemented for 2x2 and 3x3"),
                }
            }),
        };

        match outcome {
            Ok(trace) => Value::annotated(
                Value::Number(trace.value),
                &trace.steps,
                format!("Determinant: {}", format::fixed(trace.value, ctx.precision)),
            ),
            Err(e) => Value::Error(e.into()),
        }
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

    #[test]
    fn test_trace_2x2() {
        let trace = determinant_with_steps(&m(&[&[1.0, 2.0], &[3.0, 4.0]])).unwrap();
        assert_eq!(trace.value, -2.0);
        assert_eq!(
            trace.steps.as_slice(),
            &["det(A) = ad - bc", "= 1*4 - 2*3", "= 4 - 6", "= -2"]
        );
    }

    #[test]
    fn test_trace_3x3() {
        let a = m(&[&[2.0, 0.0, 1.0], &[1.0, 3.0, 2.0], &[1.0, 1.0, 1.0]]);
        let trace = determinant_with_steps(&a).unwrap();
        // 2(3-2) - 0(1-2) + 1(1-3) = 0
        assert_eq!(trace.value, 0.0);
        assert_eq!(trace.steps.len(), 5);
        assert_eq!(trace.steps.as_slice()[1], "= 2(3*1 - 2*1) - 0(1*1 - 2*1) + 1(1*1 - 3*1)");
        assert_eq!(trace.steps.as_slice()[2], "= 2(1) - 0(-1) + 1(-2)");
        assert_eq!(trace.steps.as_slice()[3], "= 2 - 0 + -2");
        assert_eq!(trace.steps.last(), Some("= 0"));
    }

    #[test]
    fn test_identity_and_repeated_rows() {
        assert_eq!(determinant(&Matrix::identity(2).unwrap()).unwrap(), 1.0);
        assert_eq!(determinant(&Matrix::identity(3).unwrap()).unwrap(), 1.0);

        let repeated = m(&[&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        assert_abs_diff_eq!(determinant(&repeated).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_larger_orders() {
        assert_eq!(determinant(&m(&[&[-3.5]])).unwrap(), -3.5);

        let a = m(&[
            &[0.0, 2.0, 0.0, 0.0],
            &[1.0, 0.0, 0.0, 0.0],
            &[0.0, 0.0, 3.0, 0.0],
            &[0.0, 0.0, 0.0, 4.0],
        ]);
        assert_abs_diff_eq!(determinant(&a).unwrap(), -24.0, epsilon = 1e-12);
        assert!(matches!(
            determinant_with_steps(&a),
            Err(MatrixError::UnsupportedSize { rows: 4, .. })
        ));
    }

    #[test]
    fn test_non_square() {
        let wide = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        assert!(matches!(determinant(&wide), Err(MatrixError::DimensionMismatch(_))));
    }

    #[test]
    fn test_overflow_is_anomaly() {
        let huge = m(&[&[1e200, 0.0], &[0.0, 1e200]]);
        assert!(matches!(determinant(&huge), Err(MatrixError::NumericAnomaly(_))));
    }

    #[test]
    fn test_determinant_fn() {
        let ctx = EvalContext::new();
        let arg = m(&[&[1.0, 2.0], &[3.0, 4.0]]).to_value();
        let result = DeterminantFn.call(&[arg], &ctx);
        assert_eq!(result.get("result").as_number(), Some(-2.0));
        assert_eq!(result.get("text").as_text(), Some("Determinant: -2.0000"));
        assert_eq!(result.get("steps").as_list().map(|s| s.len()), Some(4));
    }

    #[test]
    fn test_determinant_fn_other_orders() {
        let ctx = EvalContext::new();
        let result = DeterminantFn.call(&[Matrix::identity(4).unwrap().to_value()], &ctx);
        assert_eq!(result.get("result").as_number(), Some(1.0));
        let steps = result.get("steps");
        assert_eq!(
            steps.as_list().and_then(|s| s[0].as_text()),
            Some("Step-by-step for determinant only implemented for 2x2 and 3x3")
        );

        let wide = m(&[&[1.0, 2.0]]).to_value();
        let err = DeterminantFn.call(&[wide], &ctx);
        assert!(err.as_error().map_or(false, |e| e.is(codes::DIMENSION_MISMATCH)));
    }
}
