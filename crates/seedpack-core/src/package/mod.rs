//! Deployment packages and their components.
//!
//! A package is loaded once from the backend manifest and stays immutable for
//! the rest of a configuration session.

pub mod manifest;
pub mod schema;

pub use manifest::{ManifestDocument, RawPackage};
pub use schema::{ClusterTarget, Component, ComponentTarget, INIT_PACKAGE_KIND, Package, PackageMetadata};
