// Chat-completion providers
//
// An abstraction over chat-completion APIs with function calling. The
// orchestrator only talks to `LlmProvider`, so tests can swap in scripted
// providers and any OpenAI-compatible endpoint can be configured.

use anyhow::Result;
use async_trait::async_trait;

pub mod types;

pub mod openai;

pub mod factory;

pub use factory::create_provider;
pub use openai::OpenAIProvider;
pub use types::{ContentBlock, Message, ProviderRequest, ProviderResponse, ToolChoice};

/// Trait for chat-completion providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a conversation and wait for the complete response
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Provider name (e.g., "openai", "grok")
    fn name(&self) -> &str;

    /// Model used when the request leaves `model` empty
    fn default_model(&self) -> &str;

    fn supports_tools(&self) -> bool {
        true
    }
}
