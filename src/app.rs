// Wiring from configuration to a ready ChatSession
//
// Clients are built once here and passed down explicitly.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::chat::ChatSession;
use crate::config::{Config, ConfigError};
use crate::directory::{EmployeeDirectory, EmployeeLookup, MockDirectory, RemoteDirectory};
use crate::providers::{create_provider, LlmProvider};
use crate::tools::{default_registry, ToolExecutor};

/// Build the employee lookup for the configured policy
pub fn build_lookup(config: &Config) -> Result<EmployeeLookup> {
    let policy = config.lookup_policy();

    let remote: Option<Arc<dyn EmployeeDirectory>> = match (&config.directory, policy.uses_remote()) {
        (Some(dir), true) => Some(Arc::new(
            RemoteDirectory::new(dir.url.clone(), dir.key.clone(), dir.table.clone())
                .context("Failed to set up remote directory")?,
        )),
        _ => None,
    };

    tracing::info!(?policy, remote = remote.is_some(), "Employee lookup configured");
    Ok(EmployeeLookup::new(policy, MockDirectory::sample(), remote))
}

/// Build a session using an already constructed provider
pub fn build_session_with_provider(config: &Config, provider: Arc<dyn LlmProvider>) -> Result<ChatSession> {
    let lookup = Arc::new(build_lookup(config)?);
    let registry = default_registry(lookup)?;

    Ok(ChatSession::new(provider, ToolExecutor::new(registry), config.model.model.clone())
        .with_max_tokens(config.model.max_tokens))
}

/// Validate the configuration and build the full session
pub fn build_session(config: &Config) -> Result<ChatSession> {
    config.validate().map_err(|e| match e {
        ConfigError::MissingApiKey { provider } => {
            anyhow::anyhow!(crate::errors::api_key_missing_error(&provider))
        }
        ConfigError::RemoteNotConfigured { policy } => {
            anyhow::anyhow!(crate::errors::remote_directory_missing_error(policy.as_str()))
        }
    })?;

    let provider: Arc<dyn LlmProvider> = Arc::from(create_provider(&config.model)?);
    build_session_with_provider(config, provider)
}
