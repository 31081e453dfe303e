mod callbacks;
mod types;

pub use callbacks::*;
pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./lazyframe.toml",
        "~/.config/lazyframe/config.toml",
        "/etc/lazyframe/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.options.debounce_ms == 0 {
        return Err(lazyframe_common::Error::invalid_config(
            "options.debounce_ms must be greater than 0",
        )
        .into());
    }

    if config.metadata.enabled && config.metadata.endpoint.trim().is_empty() {
        return Err(lazyframe_common::Error::invalid_config(
            "metadata.endpoint cannot be empty while metadata lookups are enabled",
        )
        .into());
    }

    if !config.metadata.endpoint.starts_with("http://")
        && !config.metadata.endpoint.starts_with("https://")
        && config.metadata.enabled
    {
        tracing::warn!(
            endpoint = %config.metadata.endpoint,
            "Metadata endpoint is not an http(s) URL"
        );
    }

    Ok(())
}
