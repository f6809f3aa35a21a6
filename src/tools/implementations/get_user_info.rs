// get_user_info tool - employee directory lookup

use crate::directory::EmployeeLookup;
use crate::tools::registry::Tool;
use crate::tools::types::ToolInputSchema;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const TOOL_NAME: &str = "get_user_info";

#[derive(Debug, Deserialize)]
struct GetUserInfoArgs {
    name: String,
}

pub struct GetUserInfoTool {
    lookup: Arc<EmployeeLookup>,
}

impl GetUserInfoTool {
    pub fn new(lookup: Arc<EmployeeLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl Tool for GetUserInfoTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "직원 정보를 조회합니다"
    }

    fn input_schema(&self) -> ToolInputSchema {
        ToolInputSchema::simple(&[("name", "직원 이름")])
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let args: GetUserInfoArgs =
            serde_json::from_value(input).context("Missing name parameter")?;

        let outcome = self.lookup.lookup(&args.name).await;
        tracing::debug!(name = %args.name, ?outcome, "Employee lookup finished");

        Ok(outcome.to_tool_payload())
    }
}
