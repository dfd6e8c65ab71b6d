//! Registry resolution for a package
//!
//! Resolution order: the registry the lockfile says the package resolved
//! from, else a credential registry configured to replace the default,
//! else the public npm registry.

use crate::domain::{Credential, DependencyFile};
use crate::lockfile;
use crate::registry::strip_scheme;

/// The public default registry
const DEFAULT_REGISTRY: &str = "registry.npmjs.org";

/// Registries serving the public npm package set
pub const CENTRAL_REGISTRIES: [&str; 2] = ["registry.npmjs.org", "registry.yarnpkg.com"];

/// Resolves the registry serving a package
pub fn registry_for(name: &str, credentials: &[Credential], files: &[DependencyFile]) -> String {
    if let Some(registry) = locked_registry(name, files) {
        return registry;
    }

    let replacement = credentials.iter().find_map(|credential| match credential {
        Credential::NpmRegistry {
            registry,
            replaces_base: true,
            ..
        } => Some(strip_scheme(registry).to_string()),
        _ => None,
    });
    replacement.unwrap_or_else(|| DEFAULT_REGISTRY.to_string())
}

/// Whether a registry serves the public npm package set
pub fn central_registry(registry: &str) -> bool {
    CENTRAL_REGISTRIES
        .iter()
        .any(|central| registry.contains(central))
}

/// Collapses Gemfury-style registries to their host, leaving others intact
pub fn sanitized_registry(registry: &str) -> String {
    let host = registry.split('/').next().unwrap_or(registry);
    if host.ends_with("npm.fury.io") {
        host.to_string()
    } else {
        registry.to_string()
    }
}

/// Finds the registry a package resolved from in any lockfile
fn locked_registry(name: &str, files: &[DependencyFile]) -> Option<String> {
    for file in files.iter().filter(|f| f.is_lockfile()) {
        for entry in lockfile::parse(&file.content) {
            if entry.name != name {
                continue;
            }
            if let Some(registry) = entry.resolved.as_deref().and_then(registry_from_resolved) {
                return Some(registry);
            }
        }
    }
    None
}

/// Extracts the registry portion of a resolved tarball URL
fn registry_from_resolved(url: &str) -> Option<String> {
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return None;
    }
    let rest = strip_scheme(url);

    // Tarball URLs look like <registry>/<package dir>/-/<file>.tgz
    if let Some(idx) = rest.find("/-/") {
        let through_package = &rest[..idx];
        return match through_package.rfind('/') {
            Some(sep) => Some(through_package[..sep].to_string()),
            None => Some(through_package.to_string()),
        };
    }

    rest.split('/').next().map(|host| host.to_string())
}
