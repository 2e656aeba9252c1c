//! Argument extraction for the function plugins

use linea_core::{LineaError, Value};
use crate::types::{Matrix, Vector};

/// Extract a Number from a Value
pub fn extract_number(value: &Value, func: &str, arg: &str) -> Result<f64, LineaError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(LineaError::arg_type(func, arg, "Number", value.type_name())),
    }
}

/// Extract a list of Numbers from a Value
pub fn extract_number_list(value: &Value, func: &str, arg: &str) -> Result<Vec<f64>, LineaError> {
    match value {
        Value::List(items) => {
            let mut numbers = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::Number(n) => numbers.push(*n),
                    _ => return Err(LineaError::arg_type(
                        func, &format!("{}[{}]", arg, i), "Number", item.type_name()
                    )),
                }
            }
            Ok(numbers)
        }
        _ => Err(LineaError::arg_type(func, arg, "List", value.type_name())),
    }
}

/// Extract a matrix from a Value (either a Matrix object or nested list)
pub fn extract_matrix(value: &Value, func: &str, arg: &str) -> Result<Matrix, LineaError> {
    match value {
        Value::Object(obj) => {
            if let Some(Value::Text(t)) = obj.get("type") {
                if t == "Matrix" {
                    if let Some(Value::List(data)) = obj.get("data") {
                        return extract_matrix_from_nested_list(data, func, arg);
                    }
                }
            }
            Err(LineaError::arg_type(func, arg, "Matrix", "Object"))
        }
        Value::List(rows) => extract_matrix_from_nested_list(rows, func, arg),
        _ => Err(LineaError::arg_type(func, arg, "Matrix", value.type_name())),
    }
}

/// Extract a matrix from a nested list of Values
fn extract_matrix_from_nested_list(rows: &[Value], func: &str, arg: &str) -> Result<Matrix, LineaError> {
    let mut data = Vec::with_capacity(rows.len());
    for (i, row_val) in rows.iter().enumerate() {
        data.push(extract_number_list(row_val, func, &format!("{} row {}", arg, i))?);
    }

    Matrix::from_rows(data).map_err(|e| {
        LineaError::from(e).with_suggestion(format!("{}: {} must be a non-empty rectangular matrix", func, arg))
    })
}

/// Extract a vector from a Value
pub fn extract_vector(value: &Value, func: &str, arg: &str) -> Result<Vector, LineaError> {
    extract_number_list(value, func, arg).map(Vector::new)
}

/// Extract an optional text argument
pub fn extract_optional_text<'a>(value: Option<&'a Value>, func: &str, arg: &str, default: &'a str) -> Result<&'a str, LineaError> {
    match value {
        None => Ok(default),
        Some(Value::Text(s)) => Ok(s),
        Some(other) => Err(LineaError::arg_type(func, arg, "Text", other.type_name())),
    }
}

/// Check argument count against an inclusive range
pub fn check_arg_count(args: &[Value], func: &str, min: usize, max: usize) -> Result<(), LineaError> {
    if args.len() < min || args.len() > max {
        return Err(LineaError::arg_count(func, if args.len() < min { min } else { max }, args.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linea_core::codes;

    fn nested(rows: &[&[f64]]) -> Value {
        Value::List(rows.iter().map(|r| Value::from_numbers(r)).collect())
    }

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number(&Value::Number(42.0), "test", "x").unwrap(), 42.0);
        let err = extract_number(&Value::from("x"), "test", "x").unwrap_err();
        assert!(err.is(codes::ARG_TYPE));
    }

    #[test]
    fn test_extract_matrix() {
        let m = extract_matrix(&nested(&[&[1.0, 2.0], &[3.0, 4.0]]), "test", "m").unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 2);

        // Round trip through the Matrix object form
        let again = extract_matrix(&m.to_value(), "test", "m").unwrap();
        assert_eq!(again, m);
    }

    #[test]
    fn test_extract_matrix_rejects_ragged() {
        let err = extract_matrix(&nested(&[&[1.0, 2.0], &[3.0]]), "test", "m").unwrap_err();
        assert!(err.is(codes::DIMENSION_MISMATCH));
    }

    #[test]
    fn test_extract_vector_rejects_text_entry() {
        let v = Value::List(vec![Value::Number(1.0), Value::from("two")]);
        let err = extract_vector(&v, "dot", "a").unwrap_err();
        assert!(err.message.contains("a[1]"));
    }

    #[test]
    fn test_check_arg_count() {
        let args = [Value::Null];
        assert!(check_arg_count(&args, "f", 1, 2).is_ok());
        assert!(check_arg_count(&args, "f", 2, 2).unwrap_err().is(codes::ARG_COUNT));
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(extract_optional_text(None, "norm", "label", "A").unwrap(), "A");
        let b = Value::from("B");
        assert_eq!(extract_optional_text(Some(&b), "norm", "label", "A").unwrap(), "B");
    }
}
