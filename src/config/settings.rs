// Configuration structs

use serde::Deserialize;
use std::time::Duration;

use crate::directory::LookupPolicy;

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TABLE: &str = "employees";

/// Validation failures detected before any network call is made
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{provider} API key is missing")]
    MissingApiKey { provider: String },

    #[error("lookup policy '{policy}' needs a remote directory (SUPABASE_URL and SUPABASE_KEY)")]
    RemoteNotConfigured { policy: LookupPolicy },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,

    /// Remote employee table; absent means in-memory lookups only
    pub directory: Option<DirectoryConfig>,

    /// Explicitly chosen lookup policy, if any
    pub lookup: Option<LookupPolicy>,
}

impl Config {
    pub fn new(model: ModelConfig) -> Self {
        Self {
            model,
            directory: None,
            lookup: None,
        }
    }

    /// Effective policy: explicit choice, else fallback when a remote
    /// directory is configured, else mock
    pub fn lookup_policy(&self) -> LookupPolicy {
        match self.lookup {
            Some(policy) => policy,
            None if self.directory.is_some() => LookupPolicy::Fallback,
            None => LookupPolicy::Mock,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey {
                provider: self.model.provider.clone(),
            });
        }

        let policy = self.lookup_policy();
        if policy.uses_remote() && self.directory.is_none() {
            return Err(ConfigError::RemoteNotConfigured { policy });
        }

        Ok(())
    }
}

/// Chat-completion provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Override for OpenAI-compatible gateways
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            provider: default_provider(),
            api_key: api_key.into(),
            model: default_model(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Remote PostgREST employee table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryConfig {
    pub url: String,
    pub key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    1024
}

pub(crate) fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}
