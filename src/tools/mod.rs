// Tool execution system
//
// Declares the functions offered to the model and runs the ones it asks for.

pub mod executor;
pub mod implementations;
pub mod registry;
pub mod types;

use anyhow::Result;
use std::sync::Arc;

use crate::directory::EmployeeLookup;

pub use executor::ToolExecutor;
pub use registry::{Tool, ToolRegistry};
pub use types::{ToolDefinition, ToolInputSchema, ToolResult, ToolUse};

/// Registry with every built-in tool wired to its dependencies
pub fn default_registry(lookup: Arc<EmployeeLookup>) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(implementations::GetUserInfoTool::new(lookup)))?;
    Ok(registry)
}
