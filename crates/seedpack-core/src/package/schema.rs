//! Package and component types.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

/// Type tag of the package that initializes a cluster.
pub const INIT_PACKAGE_KIND: &str = "ZarfInitConfig";

/// Named unit of a package that is deployed as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Unique within the package.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Always deployed; the user cannot deselect it.
    #[serde(default)]
    pub required: bool,
    /// Initial selection for optional components.
    #[serde(default, rename = "default")]
    pub default_enabled: bool,
    /// Components sharing a group are mutually exclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "ComponentTarget::is_empty")]
    pub only: ComponentTarget,
    /// The component's manifest entry rendered as YAML, for display.
    #[serde(skip)]
    pub manifest_fragment: String,
}

impl Component {
    pub fn required(name: impl Into<String>) -> Self {
        Self::new(name, true, true)
    }

    pub fn optional(name: impl Into<String>, default_enabled: bool) -> Self {
        Self::new(name, false, default_enabled)
    }

    fn new(name: impl Into<String>, required: bool, default_enabled: bool) -> Self {
        Self {
            name: name.into(),
            description: None,
            required,
            default_enabled,
            group: None,
            only: ComponentTarget::default(),
            manifest_fragment: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.manifest_fragment = fragment.into();
        self
    }

    /// Heading used by selectors, e.g. `k3s (Optional)`.
    pub fn label(&self) -> String {
        let tag = if self.required { "Required" } else { "Optional" };
        format!("{} ({})", self.name, tag)
    }
}

/// Restricts a component to a local OS and/or cluster architecture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentTarget {
    #[serde(default, rename = "localOS", skip_serializing_if = "Option::is_none")]
    pub local_os: Option<String>,
    #[serde(default)]
    pub cluster: ClusterTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
}

impl ComponentTarget {
    pub fn is_empty(&self) -> bool {
        self.local_os.is_none() && self.cluster.architecture.is_none()
    }

    /// Unset fields match anything. An unknown cluster `architecture` matches
    /// every architecture constraint.
    pub fn matches(&self, os: &str, architecture: Option<&str>) -> bool {
        let os_ok = self.local_os.as_deref().is_none_or(|want| want == os);
        let arch_ok = match (self.cluster.architecture.as_deref(), architecture) {
            (Some(want), Some(actual)) => want == actual,
            _ => true,
        };
        os_ok && arch_ok
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ordered components plus metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    kind: String,
    metadata: PackageMetadata,
    components: Vec<Component>,
    path: Option<String>,
}

impl Package {
    /// Validates component names and uniqueness.
    pub fn new(
        kind: impl Into<String>,
        metadata: PackageMetadata,
        components: Vec<Component>,
    ) -> Result<Self, ManifestError> {
        validate_components(&components)?;
        Ok(Self {
            kind: kind.into(),
            metadata,
            components,
            path: None,
        })
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Backend path the package was read from, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn is_init(&self) -> bool {
        self.kind == INIT_PACKAGE_KIND
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn required_components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.required)
    }

    pub fn optional_components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| !c.required)
    }

    /// Copy of the package without components restricted to other targets.
    pub fn filtered_for(&self, os: &str, architecture: Option<&str>) -> Self {
        Self {
            kind: self.kind.clone(),
            metadata: self.metadata.clone(),
            components: self
                .components
                .iter()
                .filter(|c| c.only.matches(os, architecture))
                .cloned()
                .collect(),
            path: self.path.clone(),
        }
    }
}

fn validate_components(components: &[Component]) -> Result<(), ManifestError> {
    let mut seen = HashSet::new();
    for component in components {
        if !is_valid_name(&component.name) {
            return Err(ManifestError::InvalidComponentName(component.name.clone()));
        }
        if !seen.insert(component.name.as_str()) {
            return Err(ManifestError::DuplicateComponent(component.name.clone()));
        }
    }
    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
