//! Typed wrappers for the backend routes used by the package workflow.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::{ApiClient, segment_path};
use crate::package::{ManifestDocument, Package};
use crate::policy::ComponentSelectionPolicy;

/// State of the connected cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub reachable: bool,
    /// Whether the cluster has already been initialized.
    pub has_zarf: bool,
    #[serde(default)]
    pub distro: String,
}

/// Body of `PUT /packages/deploy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub package_path: String,
    /// Comma-separated optional components. Required ones are always deployed.
    pub components: String,
}

impl DeployRequest {
    pub fn new<S: AsRef<str>>(package_path: impl Into<String>, components: &[S]) -> Self {
        Self {
            package_path: package_path.into(),
            components: components
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Build from the policy's current optional selection.
    ///
    /// Returns `None` when the package was not read from a backend path.
    pub fn from_policy(policy: &ComponentSelectionPolicy) -> Option<Self> {
        let path = policy.package().path()?;
        Some(Self::new(path, &policy.optional_selection()))
    }
}

/// A component the backend is currently deploying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployingComponent {
    pub name: String,
    #[serde(default)]
    pub package_name: String,
}

/// Package and cluster routes.
#[derive(Debug, Clone, Copy)]
pub struct PackagesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PackagesApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn cluster_summary(&self) -> Result<ClusterSummary, ApiError> {
        self.client.get("/cluster/summary").await
    }

    /// Paths of init packages the backend can find.
    pub async fn find_init_packages(&self) -> Result<Vec<String>, ApiError> {
        self.client.get("/packages/find-init").await
    }

    /// Read and validate the package at `path`.
    pub async fn read_package(&self, path: &str) -> Result<Package, ReadPackageError> {
        let route = segment_path(&["packages", "read", path])?;
        let document: ManifestDocument = self.client.get(&route).await?;
        Ok(document.into_package()?)
    }

    pub async fn deploy(&self, request: &DeployRequest) -> Result<bool, ApiError> {
        self.client.put("/packages/deploy", request).await
    }

    pub async fn deploying_components(&self) -> Result<Vec<DeployingComponent>, ApiError> {
        self.client.get("/components/deployed").await
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ReadPackageError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Manifest(#[from] crate::error::ManifestError),
}
