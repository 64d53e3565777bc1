//! Method-call types
//!
//! A method call carries a method name and a map of named arguments, the way
//! host applications talk to platform code. Dispatch goes through the closed
//! `Method` enum; every other name is reported as not implemented.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{ConnectionTarget, ErrorKind, FetchError, Result};

/// Name of the certificate fetch method
pub const GET_SERVER_CERTIFICATE: &str = "getServerCertificate";

/// Incoming method call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Caller-chosen correlation id, echoed in the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Method name
    pub method: String,
    /// Named arguments
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl MethodCall {
    /// Create a method call without an id
    pub fn new(method: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            id: None,
            method: method.into(),
            arguments,
        }
    }

    /// `getServerCertificate` call for `host:port`
    pub fn get_server_certificate(host: &str, port: u16) -> Self {
        let mut arguments = Map::new();
        arguments.insert("host".to_string(), Value::from(host));
        arguments.insert("port".to_string(), Value::from(port));
        Self::new(GET_SERVER_CERTIFICATE, arguments)
    }

    /// Attach a correlation id
    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Parse one JSON-encoded call
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidArgument` if `line` is not a call object.
    pub fn from_json(line: &str) -> Result<Self> {
        serde_json::from_str(line)
            .map_err(|e| FetchError::InvalidArgument(format!("malformed method call: {}", e)))
    }
}

/// Supported methods with their validated arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// Fetch the leaf certificate of a server
    GetServerCertificate(ConnectionTarget),
}

impl TryFrom<&MethodCall> for Method {
    type Error = FetchError;

    fn try_from(call: &MethodCall) -> Result<Self> {
        match call.method.as_str() {
            GET_SERVER_CERTIFICATE => {
                let host = string_argument(&call.arguments, "host")?;
                let port = integer_argument(&call.arguments, "port")?;
                Ok(Method::GetServerCertificate(ConnectionTarget::from_parts(host, port)?))
            }
            other => Err(FetchError::UnsupportedOperation(other.to_string())),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn string_argument<'a>(arguments: &'a Map<String, Value>, name: &str) -> Result<&'a str> {
    match arguments.get(name) {
        None | Some(Value::Null) => Err(FetchError::InvalidArgument(format!("missing argument '{}'", name))),
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(FetchError::InvalidArgument(format!(
            "argument '{}' must be a string, got {}",
            name,
            type_name(other)
        ))),
    }
}

fn integer_argument(arguments: &Map<String, Value>, name: &str) -> Result<i64> {
    match arguments.get(name) {
        None | Some(Value::Null) => Err(FetchError::InvalidArgument(format!("missing argument '{}'", name))),
        Some(Value::Number(number)) => number.as_i64().ok_or_else(|| {
            FetchError::InvalidArgument(format!("argument '{}' must be an integer, got {}", name, number))
        }),
        Some(other) => Err(FetchError::InvalidArgument(format!(
            "argument '{}' must be an integer, got {}",
            name,
            type_name(other)
        ))),
    }
}

/// Outcome of a method call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResult {
    /// The call succeeded
    Success {
        /// Hex-encoded leaf certificate
        result: String,
    },
    /// The call failed
    Error {
        /// Error kind
        code: ErrorKind,
        /// Human-readable message
        message: String,
    },
    /// The method name is not supported
    NotImplemented {
        /// The rejected method name
        method: String,
    },
}

impl MethodResult {
    /// Translate an error into a caller-visible result
    pub fn from_error(err: FetchError) -> Self {
        match err {
            FetchError::UnsupportedOperation(method) => MethodResult::NotImplemented { method },
            err => MethodResult::Error {
                code: err.kind(),
                message: err.to_string(),
            },
        }
    }

    /// Whether the call succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, MethodResult::Success { .. })
    }
}

/// Result paired with the id of the call it answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub result: MethodResult,
}

impl MethodResponse {
    /// Error response for the call with `id`
    pub fn from_error(id: Option<Value>, err: FetchError) -> Self {
        Self {
            id,
            result: MethodResult::from_error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(value: Value) -> MethodCall {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_get_server_certificate() {
        let method = Method::try_from(&MethodCall::get_server_certificate("example.com", 443)).unwrap();
        assert_eq!(
            method,
            Method::GetServerCertificate(ConnectionTarget::new("example.com", 443).unwrap())
        );
    }

    #[test]
    fn test_unknown_method() {
        let err = Method::try_from(&call(json!({ "method": "getPlatformVersion" }))).unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedOperation(ref m) if m == "getPlatformVersion"));
    }

    #[test]
    fn test_missing_and_malformed_arguments() {
        let cases = [
            json!({ "method": GET_SERVER_CERTIFICATE }),
            json!({ "method": GET_SERVER_CERTIFICATE, "arguments": { "port": 443 } }),
            json!({ "method": GET_SERVER_CERTIFICATE, "arguments": { "host": "example.com" } }),
            json!({ "method": GET_SERVER_CERTIFICATE, "arguments": { "host": null, "port": 443 } }),
            json!({ "method": GET_SERVER_CERTIFICATE, "arguments": { "host": 42, "port": 443 } }),
            json!({ "method": GET_SERVER_CERTIFICATE, "arguments": { "host": "", "port": 443 } }),
            json!({ "method": GET_SERVER_CERTIFICATE, "arguments": { "host": "example.com", "port": "443" } }),
            json!({ "method": GET_SERVER_CERTIFICATE, "arguments": { "host": "example.com", "port": 443.5 } }),
            json!({ "method": GET_SERVER_CERTIFICATE, "arguments": { "host": "example.com", "port": 0 } }),
            json!({ "method": GET_SERVER_CERTIFICATE, "arguments": { "host": "example.com", "port": 70000 } }),
            json!({ "method": GET_SERVER_CERTIFICATE, "arguments": { "host": "example.com", "port": -1 } }),
        ];

        for case in cases {
            let err = Method::try_from(&call(case.clone())).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "case: {}", case);
        }
    }

    #[test]
    fn test_from_json() {
        let call = MethodCall::from_json(r#"{"id":1,"method":"getServerCertificate"}"#).unwrap();
        assert_eq!(call.id, Some(json!(1)));
        assert!(call.arguments.is_empty());

        let err = MethodCall::from_json("{\"arguments\":{}}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_result_from_error() {
        assert_eq!(
            MethodResult::from_error(FetchError::UnsupportedOperation("foo".into())),
            MethodResult::NotImplemented { method: "foo".into() }
        );

        match MethodResult::from_error(FetchError::Handshake("bad chain".into())) {
            MethodResult::Error { code, message } => {
                assert_eq!(code, ErrorKind::HandshakeError);
                assert!(message.contains("bad chain"));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_response_wire_format() {
        let response = MethodResponse {
            id: Some(json!(7)),
            result: MethodResult::Error {
                code: ErrorKind::ResolutionError,
                message: "nope".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "id": 7, "status": "error", "code": "ResolutionError", "message": "nope" })
        );

        let response = MethodResponse {
            id: None,
            result: MethodResult::Success { result: "3082".into() },
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "status": "success", "result": "3082" })
        );
    }
}
