//! Error types shared by the client, the selection policy and the stepper.

use thiserror::Error;

use crate::auth::LoginRedirect;
use crate::types::WorkflowStage;

/// Errors returned by [`crate::http::ApiClient`] requests.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No credential is set. Raised before any network call is made.
    #[error("Not authenticated yet")]
    Unauthenticated,

    /// Network-level failure (DNS, connection reset, timeout).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. The backend sends a plain-text message as the body.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Successful response whose body did not match the expected shape.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Token contains bytes that cannot be sent in an HTTP header.
    #[error("Credential is not a valid header value")]
    InvalidCredential,

    /// Session storage could not be written or cleared.
    #[error("Session storage error: {0}")]
    Session(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status of an `Api` failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Returned when a client is constructed without a stored credential.
///
/// Carries the login redirect the caller should follow. Navigating is left to
/// the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No session credential found; log in at {}", .redirect.to_location())]
pub struct Unauthenticated {
    pub redirect: LoginRedirect,
}

impl Unauthenticated {
    /// The redirect to follow from `current_path`, or `None` when the caller is
    /// already on the login route.
    pub fn redirect_from(&self, current_path: &str) -> Option<LoginRedirect> {
        if self.redirect.is_login_route(current_path) {
            None
        } else {
            Some(self.redirect.clone())
        }
    }
}

/// Errors from toggling component selectors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Required components are always deployed and cannot be unchecked.
    #[error("Component '{component}' is required and cannot be toggled")]
    InvalidOperation { component: String },

    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    /// Two components of one group were selected together.
    #[error("Components '{first}' and '{second}' are both in group '{group}'; choose one")]
    GroupConflict {
        group: String,
        first: String,
        second: String,
    },

    /// Selections are frozen once the workflow leaves the Configure stage.
    #[error("Component selection is locked during the {0} stage")]
    StageLocked(WorkflowStage),
}

/// Errors raised while loading a package manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to parse package manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to render component '{component}' as YAML: {source}")]
    Render {
        component: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid component name '{0}': use lowercase letters, digits and '-'")]
    InvalidComponentName(String),

    #[error("Duplicate component name: {0}")]
    DuplicateComponent(String),
}

/// Errors from moving the workflow between stages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot advance past the {0} stage")]
    AtFinalStage(WorkflowStage),

    #[error("Cannot go back from the {0} stage")]
    AtFirstStage(WorkflowStage),

    /// The selection policy rejected the transition.
    #[error("Cannot advance from {from}: validation failed")]
    Blocked { from: WorkflowStage },
}
