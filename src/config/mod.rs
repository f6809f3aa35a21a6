// Configuration module
// Public interface for configuration loading

mod loader;
mod settings;

pub use loader::{build_config, default_config_path, load_config, read_config_file, FileConfig};
pub use settings::{Config, ConfigError, DirectoryConfig, ModelConfig, DEFAULT_MODEL, DEFAULT_PROVIDER};
