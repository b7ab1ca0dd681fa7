//! Tool descriptors, tool calls and their results

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Description of one remote tool, as returned by provider discovery
///
/// The same value is handed to the model backend as a tool declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name (function name)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// Create a descriptor with an empty object schema
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: serde_json::json!({ "type": "object", "properties": {} }),
        }
    }

    /// Set the input schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }
}

/// Tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Backend-assigned identifier for this call
    pub id: String,
    /// Name of the tool being called
    pub name: String,
    /// Arguments keyed by parameter name
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Create a tool call from an arbitrary JSON value
    ///
    /// Backends are not consistent about argument encoding: an object is used
    /// as is, a string holding a JSON object is parsed, anything else yields
    /// no arguments.
    pub fn from_value(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        let arguments = match input {
            Value::Object(map) => map,
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
            _ => Map::new(),
        };
        Self::new(id, name, arguments)
    }
}

/// Successful tool output, ready to be folded into the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocationResult {
    /// Name of the tool that produced this result
    #[serde(rename = "toolName")]
    pub tool_name: String,
    /// Result text, capped to the configured character limit
    pub text: String,
    /// Whether the text was cut to fit the limit
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl ToolInvocationResult {
    /// Build a result, capping `text` at `char_limit` characters
    pub fn capped(tool_name: impl Into<String>, text: &str, char_limit: usize) -> Self {
        let (text, truncated) = cap_text(text, char_limit);
        Self {
            tool_name: tool_name.into(),
            text,
            truncated,
        }
    }
}

/// Cap `text` at `limit` characters (not bytes)
///
/// Returns the kept prefix and whether anything was cut.
pub fn cap_text(text: &str, limit: usize) -> (String, bool) {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => (text[..byte_idx].to_string(), true),
        None => (text.to_string(), false),
    }
}
