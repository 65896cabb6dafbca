//! Authenticated JSON client for the backend API.

use std::fmt;
use std::sync::Arc;

use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};
use url::Url;

use crate::auth::{AuthContext, Credential, LoginRedirect, SessionStore};
use crate::config::ClientConfig;
use crate::error::{ApiError, Unauthenticated};

/// Every API route lives under this prefix.
pub const API_PREFIX: &str = "/api";

/// Sends JSON requests to `<base_url>/api<path>` with the session credential.
///
/// The credential lives in the client's own [`AuthContext`]. A client without
/// a credential refuses to issue requests and fails with
/// [`ApiError::Unauthenticated`] before touching the network.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    login_path: String,
    auth: AuthContext,
    store: Arc<dyn SessionStore>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("login_path", &self.login_path)
            .field("authenticated", &self.auth.is_authenticated())
            .finish()
    }
}

impl ApiClient {
    /// Build a client from the credential in `store`.
    ///
    /// When no usable credential is stored, the store is cleared and the
    /// returned error carries the login redirect.
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, Unauthenticated> {
        let stored = store.load().unwrap_or_else(|err| {
            warn!(error = %err, "Failed to read session token");
            None
        });

        let auth = stored.and_then(|credential| match AuthContext::with_credential(&credential) {
            Ok(auth) => Some(auth),
            Err(err) => {
                warn!(error = %err, "Discarding stored session token");
                None
            }
        });

        let mut client = Self::anonymous(config, store);
        match auth {
            Some(auth) => {
                client.auth = auth;
                Ok(client)
            }
            None => {
                client.clear_session();
                Err(Unauthenticated {
                    redirect: LoginRedirect::new(&client.login_path),
                })
            }
        }
    }

    /// Build a client with no credential, for completing a login.
    pub fn anonymous(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Self {
        Self {
            http: build_http(config),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login_path: config.login_path.clone(),
            auth: AuthContext::new(),
            store,
        }
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Persist `token` and use it for every request issued from now on.
    pub fn update_credential(&mut self, token: &str) -> Result<(), ApiError> {
        let credential = Credential::new(token).ok_or(ApiError::InvalidCredential)?;

        let mut auth = self.auth.clone();
        auth.set_credential(&credential)?;
        self.store.save(&credential)?;
        self.auth = auth;

        debug!("Session credential updated");
        Ok(())
    }

    /// Drop the credential and report where to log in again.
    ///
    /// Returns `None` when `current_path` is already the login route. Calling
    /// this repeatedly is harmless.
    pub fn invalidate(&mut self, current_path: &str) -> Option<LoginRedirect> {
        self.clear_session();
        let redirect = LoginRedirect::new(&self.login_path);
        if redirect.is_login_route(current_path) {
            None
        } else {
            Some(redirect.with_next(current_path))
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, Some(body)).await
    }

    /// `Ok(true)` for a 2xx status, `Ok(false)` for any other status.
    ///
    /// Unlike the other methods a non-2xx status is not an error here; only
    /// transport failures and a missing credential are.
    pub async fn head(&self, path: &str) -> Result<bool, ApiError> {
        let result = self
            .send(&Method::HEAD, path, None::<&()>)
            .await
            .map(|response| response.status().is_success());
        if let Err(err) = &result {
            error!(method = "HEAD", path, error = %err, "API request failed");
        }
        result
    }

    /// Best-effort DELETE. Any failure is reported as `false`.
    pub async fn del(&self, path: &str) -> bool {
        match self.request::<bool, ()>(Method::DELETE, path, None).await {
            Ok(deleted) => deleted,
            Err(err) => {
                debug!(path, error = %err, "Delete failed, reporting false");
                false
            }
        }
    }

    async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let result = self.try_request(&method, path, body).await;
        if let Err(err) = &result {
            error!(method = %method, path, error = %err, "API request failed");
        }
        result
    }

    async fn try_request<T, B>(&self, method: &Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, body).await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await?;
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }

    async fn send<B>(&self, method: &Method, path: &str, body: Option<&B>) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        // Must fail before any network activity.
        let headers = self
            .auth
            .request_headers()
            .ok_or(ApiError::Unauthenticated)?;

        let url = self.endpoint(path)?;
        let mut builder = self.http.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(ApiError::Encode)?;
            builder = builder.body(payload);
        }

        debug!(method = %method, path, "Sending API request");
        Ok(builder.send().await?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let separator = if path.starts_with('/') { "" } else { "/" };
        Ok(Url::parse(&format!(
            "{}{}{}{}",
            self.base_url, API_PREFIX, separator, path
        ))?)
    }

    fn clear_session(&mut self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "Failed to clear session token");
        }
        self.auth.clear();
    }
}

/// Join `segments` into an API path, percent-encoding each one so that `/`,
/// spaces and `%` stay inside their segment.
pub fn segment_path(segments: &[&str]) -> Result<String, ApiError> {
    let mut url = Url::parse("http://localhost/")?;
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    Ok(url.path().to_string())
}

fn build_http(config: &ClientConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        "seedpack/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|err| {
        warn!(error = %err, "Failed to build configured HTTP client, using defaults");
        reqwest::Client::new()
    })
}
