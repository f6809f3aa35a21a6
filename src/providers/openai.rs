// OpenAI chat-completions provider
//
// Works for OpenAI and any endpoint speaking the same API (Grok, local
// gateways) via a custom base URL.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::types::{ContentBlock, ProviderRequest, ProviderResponse, ToolChoice};
use super::LlmProvider;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const GROK_BASE_URL: &str = "https://api.x.ai";

/// OpenAI-compatible API provider
#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    provider_name: String,
}

impl OpenAIProvider {
    pub fn new_openai(api_key: String) -> Result<Self> {
        Self::new(
            api_key,
            OPENAI_BASE_URL.to_string(),
            "gpt-4o".to_string(),
            "openai".to_string(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn new_grok(api_key: String) -> Result<Self> {
        Self::new(
            api_key,
            GROK_BASE_URL.to_string(),
            "grok-beta".to_string(),
            "grok".to_string(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a provider with custom settings
    pub fn new(
        api_key: String,
        base_url: String,
        default_model: String,
        provider_name: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model,
            provider_name,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert ProviderRequest to OpenAI API format
    fn to_openai_request(&self, request: &ProviderRequest) -> OpenAIRequest {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model.clone()
        };

        let mut messages: Vec<OpenAIMessage> = Vec::new();

        for msg in &request.messages {
            let mut text_parts = Vec::new();
            let mut tool_calls = Vec::new();
            let mut tool_results = Vec::new();

            for block in &msg.content {
                match block {
                    ContentBlock::Text { text } => text_parts.push(text.as_str()),
                    ContentBlock::ToolUse { id, name, input } => {
                        tool_calls.push(OpenAIToolCall {
                            id: id.clone(),
                            tool_type: "function".to_string(),
                            function: OpenAIToolFunction {
                                name: name.clone(),
                                arguments: input.to_string(),
                            },
                        });
                    }
                    ContentBlock::ToolResult {
                        tool_use_id,
                        content,
                        ..
                    } => tool_results.push((tool_use_id.clone(), content.clone())),
                }
            }

            if !tool_calls.is_empty() {
                // Assistant turn that requested tools; text is null when absent
                let content = if text_parts.is_empty() {
                    None
                } else {
                    Some(text_parts.join("\n"))
                };
                messages.push(OpenAIMessage::Assistant {
                    role: msg.role.clone(),
                    content,
                    tool_calls,
                });
            } else if !text_parts.is_empty() {
                messages.push(OpenAIMessage::Regular {
                    role: msg.role.clone(),
                    content: text_parts.join("\n"),
                });
            }

            for (tool_call_id, content) in tool_results {
                messages.push(OpenAIMessage::Tool {
                    role: "tool".to_string(),
                    content,
                    tool_call_id,
                });
            }
        }

        let tools: Option<Vec<OpenAITool>> = request.tools.as_ref().filter(|t| !t.is_empty()).map(|tool_defs| {
            tool_defs
                .iter()
                .map(|tool| {
                    let parameters = match serde_json::to_value(&tool.input_schema) {
                        Ok(value) => value,
                        Err(e) => {
                            tracing::warn!("Failed to convert tool schema for '{}': {}", tool.name, e);
                            serde_json::json!({})
                        }
                    };

                    OpenAITool {
                        tool_type: "function".to_string(),
                        function: OpenAIFunction {
                            name: tool.name.clone(),
                            description: tool.description.clone(),
                            parameters,
                        },
                    }
                })
                .collect()
        });

        let tool_choice = tools.as_ref().map(|_| request.tool_choice);

        OpenAIRequest {
            model,
            messages,
            max_tokens: Some(request.max_tokens),
            tools,
            tool_choice,
        }
    }

    /// Convert OpenAI response to ProviderResponse (first choice only)
    fn from_openai_response(&self, response: OpenAIResponse) -> Result<ProviderResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .context("OpenAI returned no choices in response")?;

        let mut content = Vec::new();

        if let Some(text) = choice.message.content {
            if !text.is_empty() {
                content.push(ContentBlock::Text { text });
            }
        }

        if let Some(tool_calls) = choice.message.tool_calls {
            let mut first = true;
            for tool_call in tool_calls {
                if tool_call.tool_type != "function" {
                    tracing::debug!("Skipping non-function tool call: {}", tool_call.tool_type);
                    continue;
                }
                // Only the first call is executed, so only its arguments must parse
                let input = if first {
                    parse_arguments(&tool_call.function.arguments).with_context(|| {
                        format!(
                            "Model sent malformed arguments for '{}': {}",
                            tool_call.function.name, tool_call.function.arguments
                        )
                    })?
                } else {
                    parse_arguments(&tool_call.function.arguments).unwrap_or_else(|e| {
                        tracing::warn!(
                            call_id = %tool_call.id,
                            "Keeping malformed arguments of an extra tool call as raw text: {}",
                            e
                        );
                        serde_json::Value::String(tool_call.function.arguments.clone())
                    })
                };
                first = false;
                content.push(ContentBlock::ToolUse {
                    id: tool_call.id,
                    name: tool_call.function.name,
                    input,
                });
            }
        }

        Ok(ProviderResponse {
            id: response.id,
            model: response.model,
            content,
            stop_reason: choice.finish_reason,
            role: choice.message.role,
            provider: self.provider_name.clone(),
        })
    }
}

/// Decode the JSON-string arguments of a function call
fn parse_arguments(arguments: &str) -> Result<serde_json::Value> {
    if arguments.trim().is_empty() {
        return Ok(serde_json::json!({}));
    }
    Ok(serde_json::from_str(arguments)?)
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let openai_request = self.to_openai_request(request);
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!("Sending request to {} API: {:?}", self.provider_name, openai_request);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {} API", self.provider_name))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "{} API request failed\n\nStatus: {}\nBody: {}",
                self.provider_name,
                status,
                error_body
            );
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} API response", self.provider_name))?;

        tracing::debug!("Received response: {:?}", openai_response);

        self.from_openai_response(openai_response)
    }

    fn name(&self) -> &str {
        &self.provider_name
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

// OpenAI API types

#[derive(Debug, Clone, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAITool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
}

/// OpenAI message format
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum OpenAIMessage {
    /// Plain user/assistant/system text
    Regular { role: String, content: String },
    /// Assistant turn requesting tool calls
    Assistant {
        role: String,
        content: Option<String>,
        tool_calls: Vec<OpenAIToolCall>,
    },
    /// Result of a function execution
    Tool {
        role: String,
        content: String,
        tool_call_id: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAITool {
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAIFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAIFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponse {
    id: String,
    model: String,
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponseMessage {
    role: String,
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAIToolCall {
    id: String,
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAIToolFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAIToolFunction {
    name: String,
    arguments: String, // JSON string
}
