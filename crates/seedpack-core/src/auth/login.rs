//! Login route contract.
//!
//! The login route accepts `?token=<t>&next=<path>`. Completing a login stores
//! the token on the client and yields the path to continue at. Invalidation
//! produces a [`LoginRedirect`] back to the route.

use thiserror::Error;
use url::Url;

use super::Credential;
use crate::error::ApiError;
use crate::http::ApiClient;

const DEFAULT_NEXT: &str = "/";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("Invalid login location: {0}")]
    InvalidLocation(#[from] url::ParseError),

    #[error("Login location has no token parameter")]
    MissingToken,
}

/// Where to send the user when the session is missing or invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    login_path: String,
    next: Option<String>,
}

impl LoginRedirect {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            next: None,
        }
    }

    /// Path to return to after logging in.
    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// Whether `current_path` is already the login route. Query string,
    /// fragment and trailing slashes are ignored.
    pub fn is_login_route(&self, current_path: &str) -> bool {
        let path = current_path.split(['?', '#']).next().unwrap_or(current_path);
        trim_path(path) == trim_path(&self.login_path)
    }

    /// Relative location to navigate to, e.g. `/auth?next=%2Finitialize`.
    pub fn to_location(&self) -> String {
        match &self.next {
            Some(next) => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("next", next)
                    .finish();
                format!("{}?{}", self.login_path, query)
            }
            None => self.login_path.clone(),
        }
    }
}

/// Parsed visit to the login route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginBootstrap {
    credential: Credential,
    next: String,
}

impl LoginBootstrap {
    /// Parse a login location such as `/auth?token=insecure&next=/initialize/configure`
    /// or the same as an absolute URL.
    pub fn parse(location: &str) -> Result<Self, LoginError> {
        let url = match Url::parse(location) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse("http://localhost")?.join(location)?
            }
            Err(err) => return Err(err.into()),
        };

        let mut token = None;
        let mut next = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "token" => token = Credential::new(value.into_owned()),
                "next" => next = Some(value.into_owned()),
                _ => {}
            }
        }

        let credential = token.ok_or(LoginError::MissingToken)?;
        Ok(Self {
            credential,
            next: sanitize_next(next),
        })
    }

    pub fn from_parts(credential: Credential, next: Option<String>) -> Self {
        Self {
            credential,
            next: sanitize_next(next),
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn next(&self) -> &str {
        &self.next
    }

    /// Store the token on `client` and return the path to navigate to.
    pub fn complete(self, client: &mut ApiClient) -> Result<String, ApiError> {
        client.update_credential(self.credential.expose())?;
        Ok(self.next)
    }
}

fn trim_path(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

// Only same-origin absolute paths are honored; anything else lands on `/`.
fn sanitize_next(next: Option<String>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => DEFAULT_NEXT.to_string(),
    }
}
