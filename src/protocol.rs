//! JSON-RPC envelope and MCP tool-result types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version tag carried on every envelope.
pub const JSONRPC_VERSION: &str = "2.0";
/// Version reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "0.1.0";

/// Malformed or unparseable request body.
pub const INTERNAL_ERROR: i64 = -32603;
/// Well-formed `tools/call` naming a tool we do not have.
pub const INVALID_PARAMS: i64 = -32602;

// ---------------------------------------------------------------------------
// JSON-RPC message types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
    #[serde(default)]
    pub id: Option<Value>,
}

fn default_version() -> String {
    JSONRPC_VERSION.into()
}

impl RpcRequest {
    /// Request params, or an empty map when absent.
    pub fn params(&self) -> Map<String, Value> {
        self.params.clone().unwrap_or_default()
    }
}

/// Response envelope. `result` and `error` are always present on the wire,
/// exactly one of them non-null.
#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
    pub id: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcResponse {
    pub fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn err(id: Value, code: i64, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            result: None,
            error: Some(RpcError { code, message }),
            id,
        }
    }

    /// Response for a body that could not be read as a request.
    pub fn malformed(message: String) -> Self {
        Self::err(Value::Null, INTERNAL_ERROR, message)
    }

    pub fn not_implemented(id: Value, method: &str) -> Self {
        Self::ok(
            id,
            serde_json::json!({ "message": format!("Method {method} not implemented") }),
        )
    }
}

// ---------------------------------------------------------------------------
// MCP tool result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    #[serde(
        rename = "isError",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent {
                content_type: "text".into(),
                text: text.into(),
            }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::text(text)
        }
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}
