// Provider factory
//
// Creates the chat-completion provider described by the model configuration

use anyhow::{bail, Result};

use super::openai::{OpenAIProvider, GROK_BASE_URL, OPENAI_BASE_URL};
use super::LlmProvider;
use crate::config::ModelConfig;

/// Create a provider from model settings
pub fn create_provider(config: &ModelConfig) -> Result<Box<dyn LlmProvider>> {
    if config.api_key.trim().is_empty() {
        bail!(crate::errors::api_key_missing_error(&config.provider));
    }

    let default_base = match config.provider.as_str() {
        "openai" => OPENAI_BASE_URL,
        "grok" => GROK_BASE_URL,
        other => bail!("Unknown provider: {}", other),
    };

    let provider = OpenAIProvider::new(
        config.api_key.clone(),
        config.base_url.clone().unwrap_or_else(|| default_base.to_string()),
        config.model.clone(),
        config.provider.clone(),
        config.timeout(),
    )?;

    Ok(Box::new(provider))
}
