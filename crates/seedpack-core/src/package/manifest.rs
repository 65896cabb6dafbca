//! Manifest documents as returned by the backend.
//!
//! The backend wraps a package with the path it was read from:
//!
//! ```json
//! {
//!   "path": "/opt/packages/init.tar.zst",
//!   "zarfPackage": {
//!     "kind": "ZarfInitConfig",
//!     "metadata": { "name": "init", "description": "..." },
//!     "components": [ { "name": "zarf-injector", "required": true }, ... ]
//!   }
//! }
//! ```
//!
//! Components are kept as raw JSON until conversion so their full entry can be
//! rendered as a YAML fragment for display.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Component, Package, PackageMetadata};
use crate::error::ManifestError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "zarfPackage", alias = "package")]
    pub package: RawPackage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPackage {
    pub kind: String,
    #[serde(default)]
    pub metadata: PackageMetadata,
    #[serde(default)]
    pub components: Vec<Value>,
}

impl ManifestDocument {
    pub fn parse(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_package(self) -> Result<Package, ManifestError> {
        let package = self.package.into_package()?;
        Ok(match self.path {
            Some(path) => package.with_path(path),
            None => package,
        })
    }
}

impl RawPackage {
    pub fn into_package(self) -> Result<Package, ManifestError> {
        let components = self
            .components
            .into_iter()
            .map(component_from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Package::new(self.kind, self.metadata, components)
    }
}

impl Package {
    /// Parse a backend manifest document into a validated package.
    pub fn from_manifest_json(json: &str) -> Result<Self, ManifestError> {
        ManifestDocument::parse(json)?.into_package()
    }
}

fn component_from_value(value: Value) -> Result<Component, ManifestError> {
    let mut component: Component = serde_json::from_value(value.clone())?;
    // Empty strings are how the backend omits these fields.
    if component.group.as_deref() == Some("") {
        component.group = None;
    }
    if component.description.as_deref() == Some("") {
        component.description = None;
    }
    component.manifest_fragment =
        serde_yaml::to_string(&value).map_err(|source| ManifestError::Render {
            component: component.name.clone(),
            source,
        })?;
    Ok(component)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INIT_MANIFEST: &str = r#"{
        "path": "/packages/zarf-init-amd64.tar.zst",
        "zarfPackage": {
            "kind": "ZarfInitConfig",
            "metadata": {
                "name": "init",
                "description": "Used to establish a new Zarf cluster"
            },
            "components": [
                { "name": "zarf-injector", "required": true },
                {
                    "name": "k3s",
                    "description": "*** REQUIRES ROOT *** Install K3s",
                    "only": { "localOS": "linux" },
                    "files": [{ "source": "k3s", "target": "/usr/sbin/k3s" }]
                },
                { "name": "logging", "default": true, "group": "" }
            ]
        }
    }"#;

    #[test]
    fn parses_backend_document() {
        let package = Package::from_manifest_json(INIT_MANIFEST).unwrap();

        assert!(package.is_init());
        assert_eq!(package.name(), "init");
        assert_eq!(
            package.metadata().description.as_deref(),
            Some("Used to establish a new Zarf cluster")
        );
        assert_eq!(package.path(), Some("/packages/zarf-init-amd64.tar.zst"));

        let names: Vec<_> = package.components().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["zarf-injector", "k3s", "logging"]);

        let injector = package.component("zarf-injector").unwrap();
        assert!(injector.required);

        let k3s = package.component("k3s").unwrap();
        assert!(!k3s.required);
        assert!(!k3s.default_enabled);
        assert_eq!(k3s.only.local_os.as_deref(), Some("linux"));

        let logging = package.component("logging").unwrap();
        assert!(logging.default_enabled);
        assert_eq!(logging.group, None);
    }

    #[test]
    fn fragment_contains_full_component_entry() {
        let package = Package::from_manifest_json(INIT_MANIFEST).unwrap();
        let fragment = &package.component("k3s").unwrap().manifest_fragment;

        assert!(fragment.contains("name: k3s"));
        assert!(fragment.contains("target: /usr/sbin/k3s"));
    }

    #[test]
    fn accepts_package_key_alias() {
        let json = r#"{"package": {"kind": "ZarfPackageConfig", "components": []}}"#;
        let package = Package::from_manifest_json(json).unwrap();
        assert!(!package.is_init());
        assert!(package.components().is_empty());
        assert_eq!(package.path(), None);
    }

    #[test]
    fn component_without_name_errors() {
        let json = r#"{"zarfPackage": {"kind": "ZarfInitConfig", "components": [{"required": true}]}}"#;
        assert!(matches!(
            Package::from_manifest_json(json),
            Err(ManifestError::Parse(_))
        ));
    }

    #[test]
    fn duplicate_components_error() {
        let json = r#"{"zarfPackage": {"kind": "ZarfInitConfig", "components": [
            {"name": "k3s"}, {"name": "k3s", "default": true}
        ]}}"#;
        assert!(matches!(
            Package::from_manifest_json(json),
            Err(ManifestError::DuplicateComponent(_))
        ));
    }
}
