//! TOML parser for `seedpack.toml`

use std::path::Path;

use anyhow::{Context, Result};

use super::schema::ClientConfig;

/// Parse `seedpack.toml` from disk
pub fn parse_config_toml(path: &Path) -> Result<ClientConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse `seedpack.toml` content from string
pub fn parse_config_toml_str(content: &str) -> Result<ClientConfig> {
    let config: ClientConfig =
        toml::from_str(content).map_err(|e| anyhow::anyhow!("TOML parsing error: {}", e))?;

    validate_config(&config)?;

    Ok(config)
}

pub fn to_toml(config: &ClientConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config to TOML")
}

fn validate_config(config: &ClientConfig) -> Result<()> {
    url::Url::parse(&config.base_url)
        .with_context(|| format!("Invalid base_url: {}", config.base_url))?;

    if !config.login_path.starts_with('/') {
        anyhow::bail!(
            "login_path must be an absolute route, got '{}'",
            config.login_path
        );
    }

    Ok(())
}
