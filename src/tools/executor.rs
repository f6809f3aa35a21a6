// Tool execution engine
//
// Runs one model-requested tool call and always produces a ToolResult the
// model can read; unknown names, bad arguments and handler failures become
// failure objects instead of aborting the turn.

use crate::tools::registry::ToolRegistry;
use crate::tools::types::{ToolResult, ToolUse};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

/// Tool executor - dispatches tool calls through the registry
pub struct ToolExecutor {
    registry: ToolRegistry,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Execute a single tool use
    #[instrument(skip(self, tool_use), fields(tool = %tool_use.name, id = %tool_use.id))]
    pub async fn execute_tool(&self, tool_use: &ToolUse) -> ToolResult {
        info!("Executing tool: {}", tool_use.name);

        let Some(tool) = self.registry.get(&tool_use.name) else {
            warn!("Model requested unknown tool");
            return ToolResult::failure(
                tool_use.id.clone(),
                format!("알 수 없는 함수: {}", tool_use.name),
            );
        };

        if let Err(reason) = self.registry.validate_input(&tool_use.name, &tool_use.input) {
            warn!("Tool arguments failed schema validation: {}", reason);
            return ToolResult::failure(tool_use.id.clone(), format!("잘못된 인수: {}", reason));
        }

        match tool.execute(tool_use.input.clone()).await {
            Ok(output) => {
                let succeeded = output
                    .get("success")
                    .and_then(Value::as_bool)
                    .unwrap_or(true);
                debug!(succeeded, "Tool executed");
                let content = output.to_string();
                if succeeded {
                    ToolResult::success(tool_use.id.clone(), content)
                } else {
                    ToolResult::error(tool_use.id.clone(), content)
                }
            }
            Err(e) => {
                error!("Tool execution failed: {:#}", e);
                ToolResult::failure(tool_use.id.clone(), format!("Execution error: {}", e))
            }
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}
