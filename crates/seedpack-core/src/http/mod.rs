//! HTTP access to the backend API.

pub mod client;

pub use client::{API_PREFIX, ApiClient, segment_path};
