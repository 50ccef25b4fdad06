//! Normalized result envelope
//!
//! Every execution ends in exactly one of `{"result": ...}` or
//! `{"error": {"code": ..., "message": ...}}`, whatever happened on the wire.

use serde::Serialize;
use serde_json::{Map, Value};

/// Transport failure: DNS, refused connection, timeout, broken body stream
pub const CONNECTION_ERROR: &str = "CONNECTION_ERROR";

/// A success response whose body is not JSON
pub const PARSE_ERROR: &str = "PARSE_ERROR";

/// Server error object without a usable `code`
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Error code for a non-2xx response without a structured error body
pub fn http_error_code(status: u16) -> String {
    format!("HTTP_{}", status)
}

/// The `error` member of a result envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorObject {
    pub code: String,
    pub message: String,
    /// Any other members the server sent, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ErrorObject {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            extra: Map::new(),
        }
    }

    /// Read a server-supplied error value without rejecting odd shapes
    fn from_server(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                let code = map
                    .remove("code")
                    .map(value_to_text)
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                let message = map.remove("message").map(value_to_text).unwrap_or_default();
                Self {
                    code,
                    message,
                    extra: map,
                }
            }
            other => Self::new(UNKNOWN_ERROR, value_to_text(other)),
        }
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Outcome of one execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResultEnvelope {
    /// Opaque server payload: a value for a single command, an array for a batch
    #[serde(rename = "result")]
    Success(Value),
    #[serde(rename = "error")]
    Failure(ErrorObject),
}

impl ResultEnvelope {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ResultEnvelope::Failure(ErrorObject::new(code, message))
    }

    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::error(CONNECTION_ERROR, message)
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::error(PARSE_ERROR, message)
    }

    pub fn http_error(status: u16, message: impl Into<String>) -> Self {
        Self::error(http_error_code(status), message)
    }

    /// Interpret a decoded server body.
    ///
    /// An `error` member wins over `result`; a body carrying neither is
    /// treated as the result payload itself.
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(mut map) => {
                if let Some(error) = map.remove("error") {
                    ResultEnvelope::Failure(ErrorObject::from_server(error))
                } else if let Some(result) = map.remove("result") {
                    ResultEnvelope::Success(result)
                } else {
                    ResultEnvelope::Success(Value::Object(map))
                }
            }
            other => ResultEnvelope::Success(other),
        }
    }

    /// Interpret a decoded error-status body, if it carries a server error
    pub fn from_error_body(body: Value) -> Option<Self> {
        match body {
            Value::Object(mut map) => map
                .remove("error")
                .map(|error| ResultEnvelope::Failure(ErrorObject::from_server(error))),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultEnvelope::Success(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            ResultEnvelope::Success(value) => Some(value),
            ResultEnvelope::Failure(_) => None,
        }
    }

    pub fn error_object(&self) -> Option<&ErrorObject> {
        match self {
            ResultEnvelope::Success(_) => None,
            ResultEnvelope::Failure(error) => Some(error),
        }
    }

    /// Error code when this is a failure
    pub fn code(&self) -> Option<&str> {
        self.error_object().map(|e| e.code.as_str())
    }

    pub fn to_json(&self, compact: bool) -> serde_json::Result<String> {
        if compact {
            serde_json::to_string(self)
        } else {
            serde_json::to_string_pretty(self)
        }
    }
}
