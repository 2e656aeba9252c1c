//! Runtime values crossing the engine boundary
//!
//! Values can be numbers, text, booleans, objects (matrices, eigen results,
//! step-annotated results), lists, null, or errors.

use crate::format;
use crate::{LineaError, StepLog};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Runtime value in Linea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    Object(HashMap<String, Value>),
    List(Vec<Value>),
    Null,
    Error(LineaError),
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&LineaError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get field from object. Returns Error value if not found or not an object.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(map) => map.get(key).cloned().unwrap_or_else(|| {
                Value::Error(LineaError::arg_type("get", key, "present field", "missing"))
            }),
            Value::Error(e) => Value::Error(e.clone()),
            _ => Value::Error(LineaError::arg_type("get", key, "Object", self.type_name())),
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::Bool(_) => "Bool",
            Value::Object(_) => "Object",
            Value::List(_) => "List",
            Value::Null => "Null",
            Value::Error(_) => "Error",
        }
    }

    /// List of numbers
    pub fn from_numbers(values: &[f64]) -> Value {
        Value::List(values.iter().map(|&v| Value::Number(v)).collect())
    }

    /// Wrap a result with its explanation trace and rendered text.
    ///
    /// This is the shape every registry function answers with:
    /// `{result, steps, text}`.
    pub fn annotated(result: Value, steps: &StepLog, text: impl Into<String>) -> Value {
        let mut obj = HashMap::new();
        obj.insert("result".to_string(), result);
        obj.insert(
            "steps".to_string(),
            Value::List(steps.iter().cloned().map(Value::Text).collect()),
        );
        obj.insert("text".to_string(), Value::Text(text.into()));
        Value::Object(obj)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format::plain(*n)),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Object(obj) => {
                // Smart object display based on type
                if let Some(Value::Text(t)) = obj.get("type") {
                    match t.as_str() {
                        "Matrix" => {
                            if let Some(Value::List(data)) = obj.get("data") {
                                let rows: Vec<String> = data.iter().map(|row| {
                                    if let Value::List(cols) = row {
                                        let vals: Vec<String> = cols.iter().map(|v| {
                                            if let Value::Number(n) = v { format::fixed(*n, 4) } else { v.to_string() }
                                        }).collect();
                                        format!("[{}]", vals.join(", "))
                                    } else { row.to_string() }
                                }).collect();
                                write!(f, "[{}]", rows.join("; "))
                            } else { write!(f, "[Matrix]") }
                        }
                        _ => write!(f, "[{}]", t),
                    }
                } else if let Some(Value::Text(text)) = obj.get("text") {
                    write!(f, "{}", text)
                } else {
                    write!(f, "[Object]")
                }
            }
            Value::List(items) => {
                let contents: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", contents.join(", "))
            }
            Value::Null => write!(f, "null"),
            Value::Error(e) => write!(f, "#ERROR: {}", e.code),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<LineaError> for Value {
    fn from(e: LineaError) -> Self {
        Value::Error(e)
    }
}
