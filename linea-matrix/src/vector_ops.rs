//! Fixed-dimension vector operations
//!
//! Every operand must have exactly as many components as the active
//! `Dimension`.

use linea_core::{format, Dimension, StepLog, Value};
use linea_plugin::{FunctionPlugin, FunctionMeta, ArgMeta, EvalContext};
use crate::error::{ensure_finite, MatrixError};
use crate::types::Vector;
use crate::helpers::{check_arg_count, extract_optional_text, extract_vector};

fn check_dimension(v: &Vector, dim: Dimension, what: &str) -> Result<(), MatrixError> {
    if v.len() != dim.len() {
        return Err(MatrixError::dims(format!(
            "{} has {} components, expected {} for {}", what, v.len(), dim.len(), dim
        )));
    }
    v.ensure_finite(what)
}

/// Σ aᵢbᵢ
pub fn dot(a: &Vector, b: &Vector, dim: Dimension) -> Result<f64, MatrixError> {
    check_dimension(a, dim, "vector A")?;
    check_dimension(b, dim, "vector B")?;
    let d = dot_unchecked(a, b);
    ensure_finite(&[d], "dot product")?;
    Ok(d)
}

fn dot_unchecked(a: &Vector, b: &Vector) -> f64 {
    a.as_slice().iter().zip(b.as_slice()).map(|(x, y)| x * y).sum()
}

/// Cross product; defined in three dimensions only
pub fn cross(a: &Vector, b: &Vector, dim: Dimension) -> Result<Vector, MatrixError> {
    if dim != Dimension::Three {
        return Err(MatrixError::UnsupportedOperation(format!(
            "cross product is only defined for 3D vectors, active dimension is {}", dim
        )));
    }
    check_dimension(a, dim, "vector A")?;
    check_dimension(b, dim, "vector B")?;

    let c = Vector::new(vec![
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]);
    c.ensure_finite("cross product")?;
    Ok(c)
}

/// Euclidean length
pub fn norm(v: &Vector, dim: Dimension) -> Result<f64, MatrixError> {
    check_dimension(v, dim, "vector")?;
    let n = dot_unchecked(v, v).sqrt();
    ensure_finite(&[n], "norm")?;
    Ok(n)
}

/// `v / |v|`; the zero vector comes back unchanged
pub fn normalize(v: &Vector, dim: Dimension) -> Result<Vector, MatrixError> {
    let n = norm(v, dim)?;
    if n == 0.0 {
        return Ok(v.clone());
    }
    Ok(Vector::new(v.as_slice().iter().map(|x| x / n).collect()))
}

/// Projection of `a` onto `b`; a zero `b` comes back unchanged
pub fn projection(a: &Vector, b: &Vector, dim: Dimension) -> Result<Vector, MatrixError> {
    let ab = dot(a, b, dim)?;
    let bb = dot_unchecked(b, b);
    ensure_finite(&[bb], "projection")?;
    if bb == 0.0 {
        return Ok(b.clone());
    }

    let scale = ab / bb;
    let p = Vector::new(b.as_slice().iter().map(|x| x * scale).collect());
    p.ensure_finite("projection")?;
    Ok(p)
}

/// Lift a 2D vector into 3D with `z = 0`
pub fn to_3d(v: &Vector) -> Result<Vector, MatrixError> {
    match v.len() {
        2 => Ok(Vector::new(vec![v[0], v[1], 0.0])),
        3 => Ok(v.clone()),
        n => Err(MatrixError::dims(format!("expected a 2D or 3D vector, got {} components", n))),
    }
}

static TWO_VECTOR_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "a",
        typ: "Vector",
        description: "First vector (A)",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "b",
        typ: "Vector",
        description: "Second vector (B)",
        optional: false,
        default: None,
    },
];

static LABELLED_VECTOR_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "v",
        typ: "Vector",
        description: "Vector to measure",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "label",
        typ: "Text",
        description: "Name shown in the result text",
        optional: true,
        default: Some("A"),
    },
];

fn two_vectors(args: &[Value], func: &str) -> Result<(Vector, Vector), linea_core::LineaError> {
    check_arg_count(args, func, 2, 2)?;
    let a = extract_vector(&args[0], func, "a")?;
    let b = extract_vector(&args[1], func, "b")?;
    Ok((a, b))
}

// ============================================================================
// DOT - Dot product
// ============================================================================

pub struct DotFn;

static DOT_EXAMPLES: [&str; 2] = [
    "dot([1, 2, 0], [3, 1, 0]) → 5",
    "dot([1, 0], [0, 1]) → 0",
];
static DOT_RELATED: [&str; 2] = ["cross", "norm"];

impl FunctionPlugin for DotFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "dot",
            description: "Dot product of two vectors of the active dimension",
            usage: "dot(a, b)",
            args: &TWO_VECTOR_ARGS,
            returns: "Number",
            examples: &DOT_EXAMPLES,
            category: "vector",
            related: &DOT_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let (a, b) = match two_vectors(args, "dot") {
            Ok(pair) => pair,
            Err(e) => return Value::Error(e),
        };

        match dot(&a, &b, ctx.dimension) {
            Ok(d) => Value::annotated(
                Value::Number(d),
                &StepLog::new(),
                format!("Dot Product: {}", format::fixed(d, ctx.precision)),
            ),
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============================================================================
// CROSS - Cross product
// ============================================================================

pub struct CrossFn;

static CROSS_EXAMPLES: [&str; 1] = [
    "cross([1, 0, 0], [0, 1, 0]) → [0, 0, 1]",
];
static CROSS_RELATED: [&str; 2] = ["dot", "norm"];

impl FunctionPlugin for CrossFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "cross",
            description: "Cross product of two 3D vectors",
            usage: "cross(a, b)",
            args: &TWO_VECTOR_ARGS,
            returns: "List",
            examples: &CROSS_EXAMPLES,
            category: "vector",
            related: &CROSS_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let (a, b) = match two_vectors(args, "cross") {
            Ok(pair) => pair,
            Err(e) => return Value::Error(e),
        };

        match cross(&a, &b, ctx.dimension) {
            Ok(c) => {
                let text = format!("Cross Product: {}", c.render_text(ctx.precision));
                Value::annotated(c.to_value(), &StepLog::new(), text)
            }
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============================================================================
// PROJECT - Projection of A onto B
// ============================================================================

pub struct ProjectFn;

static PROJECT_EXAMPLES: [&str; 1] = [
    "project([2, 3, 0], [1, 0, 0]) → [2, 0, 0]",
];
static PROJECT_RELATED: [&str; 2] = ["dot", "normalize"];

impl FunctionPlugin for ProjectFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "project",
            description: "Projection of vector A onto vector B",
            usage: "project(a, b)",
            args: &TWO_VECTOR_ARGS,
            returns: "List",
            examples: &PROJECT_EXAMPLES,
            category: "vector",
            related: &PROJECT_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let (a, b) = match two_vectors(args, "project") {
            Ok(pair) => pair,
            Err(e) => return Value::Error(e),
        };

        match projection(&a, &b, ctx.dimension) {
            Ok(p) => {
                let text = format!("Projection of A onto B: {}", p.render_text(ctx.precision));
                Value::annotated(p.to_value(), &StepLog::new(), text)
            }
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============================================================================
// NORM - Vector length
// ============================================================================

pub struct NormFn;

static NORM_EXAMPLES: [&str; 2] = [
    "norm([3, 4, 0]) → 5",
    "norm([1, 1], \"B\") → 1.4142",
];
static NORM_RELATED: [&str; 2] = ["normalize", "dot"];

impl FunctionPlugin for NormFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "norm",
            description: "Euclidean length of a vector",
            usage: "norm(v, [label])",
            args: &LABELLED_VECTOR_ARGS,
            returns: "Number",
            examples: &NORM_EXAMPLES,
            category: "vector",
            related: &NORM_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_count(args, "norm", 1, 2) {
            return Value::Error(e);
        }

        let v = match extract_vector(&args[0], "norm", "v") {
            Ok(v) => v,
            Err(e) => return Value::Error(e),
        };
        let label = match extract_optional_text(args.get(1), "norm", "label", "A") {
            Ok(l) => l,
            Err(e) => return Value::Error(e),
        };

        match norm(&v, ctx.dimension) {
            Ok(n) => Value::annotated(
                Value::Number(n),
                &StepLog::new(),
                format!("|{}| (norm): {}", label, format::fixed(n, ctx.precision)),
            ),
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============================================================================
// NORMALIZE - Unit vector
// ============================================================================

pub struct NormalizeFn;

static NORMALIZE_EXAMPLES: [&str; 1] = [
    "normalize([3, 4, 0]) → [0.6, 0.8, 0]",
];
static NORMALIZE_RELATED: [&str; 2] = ["norm", "project"];

impl FunctionPlugin for NormalizeFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "normalize",
            description: "Unit vector in the direction of v (zero vector unchanged)",
            usage: "normalize(v, [label])",
            args: &LABELLED_VECTOR_ARGS,
            returns: "List",
            examples: &NORMALIZE_EXAMPLES,
            category: "vector",
            related: &NORMALIZE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_count(args, "normalize", 1, 2) {
            return Value::Error(e);
        }

        let v = match extract_vector(&args[0], "normalize", "v") {
            Ok(v) => v,
            Err(e) => return Value::Error(e),
        };
        let label = match extract_optional_text(args.get(1), "normalize", "label", "A") {
            Ok(l) => l,
            Err(e) => return Value::Error(e),
        };

        match normalize(&v, ctx.dimension) {
            Ok(u) => {
                let text = format!("Normalized {}: {}", label, u.render_text(ctx.precision));
                Value::annotated(u.to_value(), &StepLog::new(), text)
            }
            Err(e) => Value::Error(e.into()),
        }
    }
}
