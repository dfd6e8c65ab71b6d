//! Registry resolution and auth configuration
//!
//! This module provides:
//! - Resolution of the registry serving a package
//! - .npmrc auth content for the staged workspace

mod finder;
mod npmrc;

pub use finder::{central_registry, registry_for, sanitized_registry, CENTRAL_REGISTRIES};
pub use npmrc::npmrc_content;

/// Strips an http or https scheme prefix
pub(crate) fn strip_scheme(url: &str) -> &str {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
}
