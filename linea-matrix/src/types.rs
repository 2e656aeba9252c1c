//! Core matrix and vector types

use std::fmt;
use std::collections::HashMap;
use std::ops::Index;
use linea_core::{format, Value};
use serde::{Serialize, Deserialize};
use crate::error::{ensure_finite, MatrixError};

/// Dense row-major matrix of `f64`.
///
/// Always non-empty and rectangular. Engines never mutate a `Matrix` they
/// are handed; they work on clones of its rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    data: Vec<Vec<f64>>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Build from nested rows, validating shape
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(MatrixError::dims("matrix must have at least one row and one column"));
        }

        for (i, row) in data.iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::dims(format!(
                    "row {} has {} columns, expected {}",
                    i, row.len(), cols
                )));
            }
        }

        Ok(Matrix { data, rows, cols })
    }

    /// Rows already known to be rectangular and non-empty
    pub(crate) fn from_rows_unchecked(data: Vec<Vec<f64>>) -> Self {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        Matrix { data, rows, cols }
    }

    /// `n x n` identity; `n` must be at least one
    pub fn identity(n: usize) -> Result<Self, MatrixError> {
        let data = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();
        Self::from_rows(data)
    }

    pub fn zeros(rows: usize, cols: usize) -> Result<Self, MatrixError> {
        Self::from_rows(vec![vec![0.0; cols]; rows])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Order of a square matrix
    pub fn order(&self) -> Option<usize> {
        if self.is_square() { Some(self.rows) } else { None }
    }

    /// Get element at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        self.data.get(row).map(Vec::as_slice)
    }

    pub fn as_rows(&self) -> &[Vec<f64>] {
        &self.data
    }

    /// Owned working copy of the rows
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.clone()
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter().flatten()
    }

    pub(crate) fn ensure_finite(&self, what: &str) -> Result<(), MatrixError> {
        ensure_finite(self.iter(), what)
    }

    /// Tab-separated rows, one per line
    pub fn render_text(&self) -> String {
        self.data
            .iter()
            .map(|row| row.iter().map(|&v| format::plain(v)).collect::<Vec<_>>().join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Convert to Value
    pub fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row][col]
    }
}

/// Fixed-length real vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector(Vec<f64>);

impl Vector {
    pub fn new(data: Vec<f64>) -> Self {
        Vector(data)
    }

    pub fn zeros(len: usize) -> Self {
        Vector(vec![0.0; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }

    pub(crate) fn ensure_finite(&self, what: &str) -> Result<(), MatrixError> {
        ensure_finite(&self.0, what)
    }

    /// `[a, b, c]` with `decimals` digits per entry
    pub fn render_text(&self, decimals: usize) -> String {
        format::fixed_list(&self.0, decimals)
    }

    pub fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Vector(data)
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", format::fixed_list(row, 4))?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format::fixed_list(&self.0, 4))
    }
}

/// Convert Matrix to Value
impl From<Matrix> for Value {
    fn from(m: Matrix) -> Value {
        let mut obj = HashMap::new();
        obj.insert("type".to_string(), Value::Text("Matrix".to_string()));
        obj.insert("rows".to_string(), Value::Number(m.rows() as f64));
        obj.insert("cols".to_string(), Value::Number(m.cols() as f64));

        let data: Vec<Value> = m.data.iter().map(|row| Value::from_numbers(row)).collect();
        obj.insert("data".to_string(), Value::List(data));

        Value::Object(obj)
    }
}

/// Convert Vector to Value
impl From<Vector> for Value {
    fn from(v: Vector) -> Value {
        Value::from_numbers(&v.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_creation() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();

        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 2);
        assert!(m.is_square());
        assert_eq!(m.order(), Some(2));
        assert_eq!(m.get(1, 0), Some(3.0));
        assert_eq!(m.get(2, 2), None);
        assert_eq!(m[(0, 1)], 2.0);
    }

    #[test]
    fn test_ragged_and_empty_rejected() {
        assert!(matches!(
            Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(MatrixError::DimensionMismatch(_))
        ));
        assert!(Matrix::from_rows(vec![]).is_err());
        assert!(Matrix::from_rows(vec![vec![]]).is_err());
    }

    #[test]
    fn test_identity() {
        let id = Matrix::identity(3).unwrap();
        assert_eq!(id.as_rows()[1], vec![0.0, 1.0, 0.0]);
        assert_eq!(id.order(), Some(3));
    }

    #[test]
    fn test_empty_constructors_rejected() {
        assert!(matches!(Matrix::identity(0), Err(MatrixError::DimensionMismatch(_))));
        assert!(Matrix::zeros(2, 0).is_err());
        assert!(Matrix::zeros(0, 2).is_err());
        assert_eq!(Matrix::zeros(1, 2).unwrap().as_rows(), &[vec![0.0, 0.0]]);
    }

    #[test]
    fn test_render_text() {
        let m = Matrix::from_rows(vec![vec![1.0, 0.5], vec![-2.0, 4.0]]).unwrap();
        assert_eq!(m.render_text(), "1\t0.5\n-2\t4");
        assert_eq!(m.to_string(), "[[1.0000, 0.5000], [-2.0000, 4.0000]]");
    }

    #[test]
    fn test_matrix_to_value() {
        let v = Matrix::identity(2).unwrap().to_value();
        assert_eq!(v.get("type").as_text(), Some("Matrix"));
        assert_eq!(v.get("rows").as_number(), Some(2.0));
        assert_eq!(v.get("data").as_list().map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_vector_basics() {
        let v = Vector::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(v.len(), 3);
        assert_eq!(v[2], 3.0);
        assert_eq!(v.render_text(2), "[1.00, 2.00, 3.00]");
        assert_eq!(v.to_value().as_list().map(|l| l.len()), Some(3));
    }
}
