//! Credential and per-client header state.

use std::fmt;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::error::ApiError;

/// Opaque bearer token. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for an empty token, which counts as no credential.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Headers sent with every request issued by one client.
///
/// `Content-Type: application/json` is always present. `Authorization` is
/// present only while a credential is set.
#[derive(Debug, Clone)]
pub struct AuthContext {
    headers: HeaderMap,
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthContext {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self { headers }
    }

    pub fn with_credential(credential: &Credential) -> Result<Self, ApiError> {
        let mut ctx = Self::new();
        ctx.set_credential(credential)?;
        Ok(ctx)
    }

    pub fn set_credential(&mut self, credential: &Credential) -> Result<(), ApiError> {
        let mut value =
            HeaderValue::from_str(credential.expose()).map_err(|_| ApiError::InvalidCredential)?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.headers.remove(AUTHORIZATION);
    }

    pub fn is_authenticated(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    pub fn authorization(&self) -> Option<&HeaderValue> {
        self.headers.get(AUTHORIZATION)
    }

    /// Snapshot of the headers for a new request, or `None` when no credential
    /// is set. Later credential changes do not affect the returned map.
    pub fn request_headers(&self) -> Option<HeaderMap> {
        self.is_authenticated().then(|| self.headers.clone())
    }
}
