//! JSON-lines request handling
//!
//! One request object per input line, one response object per output line.
//! Requests without an `id` are notifications and produce no response.

use std::collections::HashMap;
use linea_core::{codes, Dimension, LineaError, Value};
use linea_plugin::PluginRegistry;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use thiserror::Error;
use tracing::{debug, warn};
use crate::config::Settings;

#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Failures of the driver itself, before or around dispatch
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("{}", .0.message)]
    Function(LineaError),
}

impl RequestError {
    fn into_body(self) -> ErrorBody {
        match self {
            RequestError::Function(e) => ErrorBody {
                code: e.code,
                message: e.message,
                suggestion: e.suggestion,
            },
            other => {
                let code = match &other {
                    RequestError::Parse(_) => codes::PARSE_ERROR,
                    RequestError::MethodNotFound(_) => "METHOD_NOT_FOUND",
                    _ => "INVALID_PARAMS",
                };
                ErrorBody {
                    code: code.to_string(),
                    message: other.to_string(),
                    suggestion: None,
                }
            }
        }
    }
}

/// Registry plus the defaults every request starts from
pub struct Driver {
    registry: PluginRegistry,
    settings: Settings,
}

impl Driver {
    pub fn new(registry: PluginRegistry, settings: Settings) -> Self {
        Self { registry, settings }
    }

    /// Handle one input line; `None` when no response is due
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                let response = self.handle(&request);
                if request.id.is_none() {
                    debug!(method = %request.method, "notification processed");
                    return None;
                }
                response
            }
            Err(e) => {
                warn!(error = %e, "unparseable request");
                Response {
                    id: None,
                    result: None,
                    error: Some(RequestError::from(e).into_body()),
                }
            }
        };

        match serde_json::to_string(&response) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(error = %e, "failed to serialize response");
                None
            }
        }
    }

    pub fn handle(&self, request: &Request) -> Response {
        debug!(method = %request.method, "request");
        let result = match request.method.as_str() {
            "ping" => Ok(json!({})),
            "call" => self.call(request.params.as_ref()),
            "help" => self.help(request.params.as_ref()),
            "list_functions" => self.list_functions(request.params.as_ref()),
            other => Err(RequestError::MethodNotFound(other.to_string())),
        };

        match result {
            Ok(r) => Response { id: request.id.clone(), result: Some(r), error: None },
            Err(e) => Response { id: request.id.clone(), result: None, error: Some(e.into_body()) },
        }
    }

    fn call(&self, params: Option<&JsonValue>) -> Result<JsonValue, RequestError> {
        let params = params.ok_or_else(|| RequestError::InvalidParams("missing params".to_string()))?;
        let function = params
            .get("function")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| RequestError::InvalidParams("missing function name".to_string()))?;

        let args: Vec<Value> = match params.get("args") {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(items)) => items.iter().map(json_to_value).collect(),
            Some(_) => return Err(RequestError::InvalidParams("args must be an array".to_string())),
        };

        let mut ctx = self.settings.context();
        if let Some(raw) = params.get("dimension") {
            ctx = ctx.with_dimension(parse_dimension(raw)?);
        }

        match self.registry.call_function(function, &args, &ctx) {
            Value::Error(e) => Err(RequestError::Function(e)),
            value => Ok(value_to_json(&value)),
        }
    }

    fn help(&self, params: Option<&JsonValue>) -> Result<JsonValue, RequestError> {
        let name = params.and_then(|p| p.get("function")).and_then(JsonValue::as_str);
        match self.registry.help(name) {
            Value::Error(e) => Err(RequestError::Function(e)),
            value => Ok(value_to_json(&value)),
        }
    }

    fn list_functions(&self, params: Option<&JsonValue>) -> Result<JsonValue, RequestError> {
        let category = params.and_then(|p| p.get("category")).and_then(JsonValue::as_str);
        Ok(value_to_json(&self.registry.list_functions(category)))
    }
}

fn parse_dimension(raw: &JsonValue) -> Result<Dimension, RequestError> {
    let parsed = match raw {
        JsonValue::Number(n) => n.as_u64().and_then(|d| Dimension::from_len(d as usize)),
        JsonValue::String(s) => s.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| RequestError::InvalidParams(format!("dimension must be 2 or 3, got {}", raw)))
}

pub fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Array(arr) => Value::List(arr.iter().map(json_to_value).collect()),
        JsonValue::Object(obj) => Value::Object(
            obj.iter().map(|(k, v)| (k.clone(), json_to_value(v))).collect::<HashMap<_, _>>(),
        ),
    }
}

pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => serde_json::Number::from_f64(*n).map(JsonValue::Number).unwrap_or(JsonValue::Null),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::List(l) => JsonValue::Array(l.iter().map(value_to_json).collect()),
        Value::Object(o) => JsonValue::Object(o.iter().map(|(k, v)| (k.clone(), value_to_json(v))).collect()),
        Value::Error(e) => json!({"_error": {"code": e.code, "message": e.message}}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> Driver {
        Driver::new(linea_matrix::standard_registry(), Settings::default())
    }

    fn respond(line: &str) -> JsonValue {
        let out = driver().handle_line(line).expect("expected a response");
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn test_ping() {
        let response = respond(r#"{"id": 1, "method": "ping"}"#);
        assert_eq!(response, json!({"id": 1, "result": {}}));
    }

    #[test]
    fn test_call_determinant() {
        let response = respond(
            r#"{"id": 2, "method": "call", "params": {"function": "determinant", "args": [[[1, 2], [3, 4]]]}}"#,
        );
        assert_eq!(response["id"], json!(2));
        assert_eq!(response["result"]["result"], json!(-2.0));
        assert_eq!(response["result"]["steps"][0], json!("det(A) = ad - bc"));
    }

    #[test]
    fn test_call_with_dimension_override() {
        let line = r#"{"id": "a", "method": "call", "params": {"function": "cross", "args": [[1, 0], [0, 1]], "dimension": 2}}"#;
        let response = respond(line);
        assert_eq!(response["error"]["code"], json!("UNSUPPORTED_OPERATION"));

        let line = r#"{"id": "b", "method": "call", "params": {"function": "dot", "args": [[1, 2], [3, 4]], "dimension": "2d"}}"#;
        let response = respond(line);
        assert_eq!(response["result"]["result"], json!(11.0));
    }

    #[test]
    fn test_errors() {
        let response = respond(r#"{"id": 3, "method": "bogus"}"#);
        assert_eq!(response["error"]["code"], json!("METHOD_NOT_FOUND"));

        let response = respond(r#"{"id": 4, "method": "call", "params": {"function": "rank"}}"#);
        assert_eq!(response["error"]["code"], json!("ARG_COUNT"));

        let response = respond(r#"{"id": 5, "method": "call", "params": {"function": "dot", "args": [], "dimension": 4}}"#);
        assert_eq!(response["error"]["code"], json!("INVALID_PARAMS"));

        let response = respond("not json");
        assert_eq!(response["error"]["code"], json!("PARSE_ERROR"));
        assert!(response.get("id").is_none());
    }

    #[test]
    fn test_notification_gets_no_response() {
        assert!(driver().handle_line(r#"{"method": "ping"}"#).is_none());
    }

    #[test]
    fn test_help_and_listing() {
        let response = respond(r#"{"id": 6, "method": "help", "params": {"function": "eigen"}}"#);
        assert_eq!(response["result"]["usage"], json!("eigen(matrix)"));

        let response = respond(r#"{"id": 7, "method": "list_functions", "params": {"category": "solve"}}"#);
        assert_eq!(response["result"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_value_conversion() {
        let json = json!({"m": [[1, 2.5]], "label": "A", "flag": true});
        let value = json_to_value(&json);
        assert_eq!(value.get("label").as_text(), Some("A"));
        assert_eq!(value_to_json(&value), json!({"m": [[1.0, 2.5]], "label": "A", "flag": true}));
        assert_eq!(value_to_json(&Value::Number(f64::NAN)), JsonValue::Null);
    }
}
