// Configuration loader
//
// Sources, lowest precedence first: built-in defaults, TOML file
// (~/.staffcall/config.toml or an explicit path), `.env`, process
// environment. CLI flags are applied on top by the binary.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::{default_table, Config, DirectoryConfig, ModelConfig};
use crate::directory::LookupPolicy;

/// On-disk layout of config.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub model: Option<ModelConfig>,
    #[serde(default)]
    pub directory: Option<DirectoryConfig>,
    #[serde(default)]
    pub lookup: Option<LookupPolicy>,
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".staffcall/config.toml"))
}

/// Load configuration from file, `.env` and environment
///
/// An explicit `path` must exist; the default path is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Ok(env_path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", env_path.display());
    }

    let file = match path {
        Some(path) => Some(read_config_file(path)?),
        None => match default_config_path() {
            Some(path) if path.exists() => Some(read_config_file(&path)?),
            _ => None,
        },
    };

    build_config(file, |key| std::env::var(key).ok())
}

/// Parse a TOML config file
pub fn read_config_file(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!(crate::errors::config_parse_error(&path.display().to_string(), &e.to_string())))
}

/// Merge file settings with environment variables looked up through `env`
pub fn build_config<F>(file: Option<FileConfig>, env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let file = file.unwrap_or_default();
    let mut model = file.model.unwrap_or_default();

    if let Some(api_key) = var("OPENAI_API_KEY") {
        model.api_key = api_key;
    }
    if let Some(name) = var("STAFFCALL_MODEL") {
        model.model = name;
    }
    if let Some(base_url) = var("OPENAI_BASE_URL") {
        model.base_url = Some(base_url);
    }

    // Each variable overrides its own field; without a file section both
    // URL and key are needed before a remote directory exists
    let directory = match (file.directory, var("SUPABASE_URL"), var("SUPABASE_KEY")) {
        (Some(mut dir), url, key) => {
            if let Some(url) = url {
                dir.url = url;
            }
            if let Some(key) = key {
                dir.key = key;
            }
            Some(dir)
        }
        (None, Some(url), Some(key)) => Some(DirectoryConfig {
            url,
            key,
            table: default_table(),
        }),
        (None, _, _) => None,
    };
    let directory = directory.map(|mut dir| {
        if let Some(table) = var("SUPABASE_TABLE") {
            dir.table = table;
        }
        dir
    });

    let lookup = match var("STAFFCALL_LOOKUP") {
        Some(raw) => Some(raw.parse::<LookupPolicy>().context("Invalid STAFFCALL_LOOKUP")?),
        None => file.lookup,
    };

    Ok(Config {
        model,
        directory,
        lookup,
    })
}
