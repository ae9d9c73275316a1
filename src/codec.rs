//! JSON method codec, wire-compatible with the UI framework's `JSONMethodCodec`.
//!
//! - call: `{"method": "<name>", "args": <value>}`
//! - success reply: `[<result>]`
//! - error reply: `[<code>, <message>, <details>]`
//! - not implemented: zero-length reply

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::WindowPlusError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub args: Value,
}

impl MethodCall {
    pub fn new(method: &str, args: Value) -> Self {
        MethodCall {
            method: method.to_string(),
            args,
        }
    }

    /// Looks up `key` in a map argument. `None` when args are not a map or the key is absent/null.
    pub fn argument(&self, key: &str) -> Option<&Value> {
        self.args.as_object()?.get(key).filter(|v| !v.is_null())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    Success(Value),
    Error {
        code: String,
        message: Option<String>,
        details: Value,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn success_empty() -> Self {
        MethodResponse::Success(Value::Null)
    }
}

impl From<WindowPlusError> for MethodResponse {
    fn from(err: WindowPlusError) -> Self {
        MethodResponse::Error {
            code: err.code().to_string(),
            message: Some(err.to_string()),
            details: Value::Null,
        }
    }
}

pub fn encode_method_call(call: &MethodCall) -> Vec<u8> {
    json!({ "method": call.method, "args": call.args })
        .to_string()
        .into_bytes()
}

pub fn decode_method_call(bytes: &[u8]) -> Result<MethodCall, WindowPlusError> {
    serde_json::from_slice::<MethodCall>(bytes)
        .map_err(|e| WindowPlusError::MalformedMessage(e.to_string()))
}

pub fn encode_response(response: &MethodResponse) -> Vec<u8> {
    match response {
        MethodResponse::Success(result) => json!([result]).to_string().into_bytes(),
        MethodResponse::Error {
            code,
            message,
            details,
        } => json!([code, message, details]).to_string().into_bytes(),
        MethodResponse::NotImplemented => Vec::new(),
    }
}

pub fn decode_response(bytes: &[u8]) -> Result<MethodResponse, WindowPlusError> {
    if bytes.is_empty() {
        return Ok(MethodResponse::NotImplemented);
    }
    let envelope: Vec<Value> = serde_json::from_slice(bytes)
        .map_err(|e| WindowPlusError::MalformedMessage(e.to_string()))?;
    let mut items = envelope.into_iter();
    match (items.next(), items.next(), items.next(), items.next()) {
        (Some(result), None, None, None) => Ok(MethodResponse::Success(result)),
        (Some(Value::String(code)), Some(message), Some(details), None) => {
            Ok(MethodResponse::Error {
                code,
                message: message.as_str().map(str::to_string),
                details,
            })
        }
        _ => Err(WindowPlusError::MalformedMessage(
            "reply envelope must hold 1 or 3 elements".to_string(),
        )),
    }
}
