//! Seedpack Core Library
//!
//! Client-side workflow for configuring, reviewing and deploying a
//! cluster-initialization package: the authenticated API client and the
//! component-selection policy that drives the Configure → Review → Deploy
//! stepper.

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod package;
pub mod policy;
pub mod types;
pub mod workflow;

/// Re-exports of commonly used types
pub mod prelude {
    // Auth & client
    pub use crate::auth::{
        AuthContext, Credential, FileSessionStore, LoginBootstrap, LoginRedirect,
        MemorySessionStore, SessionStore,
    };
    pub use crate::http::ApiClient;

    // Configuration
    pub use crate::config::{ClientConfig, ConfigStore};
    pub use crate::context::AppContext;

    // Errors
    pub use crate::error::{ApiError, SelectionError, TransitionError, Unauthenticated};

    // Packages & selection
    pub use crate::package::{Component, Package, PackageMetadata};
    pub use crate::policy::{AdvanceRule, ComponentSelectionPolicy, ComponentView, SelectorState};

    // Workflow
    pub use crate::types::WorkflowStage;
    pub use crate::workflow::{StepStatus, Stepper};

    // API
    pub use crate::api::{ClusterSummary, DeployRequest, PackagesApi};
}
