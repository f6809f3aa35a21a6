// Core types for tool execution
//
// Tool definitions are plain declarative values handed to the model; the
// schema travels as JSON Schema under the provider's "parameters" key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declaration of one invocable function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: ToolInputSchema,
}

/// JSON Schema for tool input parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(rename = "type")]
    pub schema_type: String, // Usually "object"
    pub properties: Value,
    pub required: Vec<String>,
}

impl ToolInputSchema {
    /// Create a schema whose parameters are all required strings
    pub fn simple(params: &[(&str, &str)]) -> Self {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for (param_name, param_desc) in params {
            properties.insert(
                param_name.to_string(),
                serde_json::json!({
                    "type": "string",
                    "description": param_desc
                }),
            );
            required.push(param_name.to_string());
        }

        Self {
            schema_type: "object".to_string(),
            properties: Value::Object(properties),
            required,
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "type": self.schema_type,
            "properties": self.properties,
            "required": self.required,
        })
    }
}

/// Tool-call request issued by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUse {
    /// Opaque call id, echoed back with the result
    pub id: String,
    pub name: String,
    /// Parsed arguments (JSON object)
    pub input: Value,
}

impl ToolUse {
    pub fn generate_id() -> String {
        format!("call_{}", uuid::Uuid::new_v4().simple())
    }

    pub fn new(name: String, input: Value) -> Self {
        Self {
            id: Self::generate_id(),
            name,
            input,
        }
    }
}

/// Tool execution result, serialized for the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_use_id: String,
    /// JSON text of the result object
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(tool_use_id: String, content: String) -> Self {
        Self {
            tool_use_id,
            content,
            is_error: false,
        }
    }

    pub fn error(tool_use_id: String, error_message: String) -> Self {
        Self {
            tool_use_id,
            content: error_message,
            is_error: true,
        }
    }

    /// Failure in the `{"success": false, "message": ...}` shape the model sees
    pub fn failure(tool_use_id: String, message: impl Into<String>) -> Self {
        let body = serde_json::json!({
            "success": false,
            "message": message.into(),
        });
        Self::error(tool_use_id, body.to_string())
    }

    /// Parsed content, if it is JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.content).ok()
    }
}
