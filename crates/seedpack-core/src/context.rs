//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::auth::{FileSessionStore, SessionStore};
use crate::config::{ClientConfig, ConfigStore, default_config_dir, default_state_dir};
use crate::error::Unauthenticated;
use crate::http::ApiClient;

/// Resolved directories plus the loaded client configuration.
///
/// Frontends create this once and pass it to commands.
#[derive(Debug, Clone)]
pub struct AppContext {
    config_dir: PathBuf,
    state_dir: PathBuf,
    config: ClientConfig,
}

impl AppContext {
    /// Resolve platform directories and load `seedpack.toml` if present.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Self::from_dirs(default_config_dir(&home_dir), default_state_dir(&home_dir))
    }

    /// Create a context with explicit directories (for testing).
    pub fn from_dirs(config_dir: PathBuf, state_dir: PathBuf) -> anyhow::Result<Self> {
        let config = ConfigStore::from_dir(&config_dir).load()?;
        Ok(Self {
            config_dir,
            state_dir,
            config,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::from_dir(&self.config_dir)
    }

    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        Arc::new(FileSessionStore::new(&self.state_dir))
    }

    /// Client authenticated from the persisted session.
    pub fn client(&self) -> Result<ApiClient, Unauthenticated> {
        ApiClient::new(&self.config, self.session_store())
    }

    /// Client without a credential, for logging in.
    pub fn anonymous_client(&self) -> ApiClient {
        ApiClient::anonymous(&self.config, self.session_store())
    }
}
