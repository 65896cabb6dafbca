//! Config store for loading and saving seedpack.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{ClientConfig, parser, paths::config_path};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    pub fn from_dir(config_dir: &Path) -> Self {
        Self {
            config_path: config_path(config_dir),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> anyhow::Result<ClientConfig> {
        if !self.config_path.exists() {
            return Ok(ClientConfig::default());
        }
        parser::parse_config_toml(&self.config_path)
    }

    pub fn save(&self, config: &ClientConfig) -> anyhow::Result<()> {
        let content = parser::to_toml(config)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.config_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;
        Ok(())
    }
}
