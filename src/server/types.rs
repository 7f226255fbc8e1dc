use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_MESSAGE: &str = "Hello";
pub const UPSTREAM_FAILURE: &str = "Failed to connect to the chatbot API.";
pub const INVALID_BODY: &str = "Invalid JSON body.";

/// Inbound body. Only `message` is read; anything else is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboundRequest {
    pub message: Option<Value>,
}

impl InboundRequest {
    pub fn from_json(body: &Value) -> Self {
        Self {
            message: body.get("message").cloned(),
        }
    }

    /// The text to forward: the message when it is truthy, `"Hello"` otherwise.
    /// Strings pass through verbatim, other truthy values as compact JSON.
    pub fn effective_message(&self) -> String {
        match &self.message {
            None | Some(Value::Null) | Some(Value::Bool(false)) => DEFAULT_MESSAGE.to_string(),
            Some(Value::String(s)) if s.is_empty() => DEFAULT_MESSAGE.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => DEFAULT_MESSAGE.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RelayResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}
