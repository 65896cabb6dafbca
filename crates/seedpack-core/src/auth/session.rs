//! Persistent session storage for the bearer token.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::Credential;

/// Key the token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Where the session token survives between client instances.
pub trait SessionStore: Send + Sync {
    /// Stored token, or `None` if no session exists.
    fn load(&self) -> io::Result<Option<Credential>>;

    fn save(&self, credential: &Credential) -> io::Result<()>;

    /// Removes the stored token. Succeeds when nothing is stored.
    fn clear(&self) -> io::Result<()>;
}

/// Stores the token in a file named `token` inside a state directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(TOKEN_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> io::Result<Option<Credential>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Credential::new(content.trim_end_matches(['\r', '\n']))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn save(&self, credential: &Credential) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, credential.expose())
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// In-process store, for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<Credential>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Credential::new(token)),
        }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Option<Credential>>> {
        self.token
            .lock()
            .map_err(|_| io::Error::other("session store lock poisoned"))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> io::Result<Option<Credential>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, credential: &Credential) -> io::Result<()> {
        *self.lock()? = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}
