// Tool registry and trait definition
//
// Maps function names to typed handlers. Every handler's declared schema is
// compiled once at registration so arguments can be checked before the
// handler runs.

use crate::tools::types::{ToolDefinition, ToolInputSchema};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Tool trait - all tools must implement this
#[async_trait]
pub trait Tool: Send + Sync {
    /// Function name the model calls (e.g., "get_user_info")
    fn name(&self) -> &str;

    /// Tells the model when to use the tool
    fn description(&self) -> &str;

    /// JSON Schema defining expected input parameters
    fn input_schema(&self) -> ToolInputSchema;

    /// Execute with arguments that already passed schema validation
    async fn execute(&self, input: Value) -> Result<Value>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

struct RegisteredTool {
    tool: Box<dyn Tool>,
    validator: jsonschema::Validator,
}

/// Registry of available tools
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        let schema = tool.input_schema().to_json();
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| anyhow!("Invalid input schema for tool '{}': {}", name, e))?;

        if self.tools.insert(name.clone(), RegisteredTool { tool, validator }).is_some() {
            tracing::warn!("Tool '{}' registered twice, keeping the latest", name);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|r| r.tool.as_ref())
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Check `input` against the named tool's schema
    ///
    /// Returns the validation messages on failure (at most three).
    pub fn validate_input(&self, name: &str, input: &Value) -> Result<(), String> {
        let Some(registered) = self.tools.get(name) else {
            return Err(format!("unknown tool '{}'", name));
        };

        if registered.validator.is_valid(input) {
            return Ok(());
        }

        let msgs: Vec<String> = registered
            .validator
            .iter_errors(input)
            .take(3)
            .map(|err| err.to_string())
            .collect();
        Err(msgs.join("; "))
    }

    /// Tool names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Definitions handed to the model, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|r| r.tool.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
