//! Resolver failure classification
//!
//! This module provides:
//! - Ordered pattern rules mapping resolver failure text onto UpdateError
//! - Package name extraction from failure messages
//!
//! The resolver reports everything through one unstructured message, so
//! these patterns are the only channel for deciding whether a failure is
//! the project's fault, a registry problem, or a bug worth surfacing. The
//! rules run in order and the first decisive match wins; keep new patterns
//! ahead of any rule that would claim their messages as a substring.

use crate::domain::DependencyFile;
use crate::error::{HelperError, UpdateError};
use crate::updater::LockfileUpdater;
use crate::{lockfile, manifest, registry};
use regex::Regex;
use std::sync::LazyLock;

static INVALID_PACKAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Can't add "[^"]*": invalid"#).unwrap());
static PACKAGE_REQUIREMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"package "([^"]*)""#).unwrap());
static PACKAGE_NOT_FOUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([^/]+): Not found").unwrap());
static UNREACHABLE_GIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ls-remote --tags --heads (.*)").unwrap());
static TIMEOUT_FETCHING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+)/([^/]+): ETIMEDOUT").unwrap());

impl LockfileUpdater {
    /// Maps a resolver failure onto a typed error, or swallows it when the
    /// failure is benign for this project.
    ///
    /// Returns `Ok(())` when the failure should be ignored and the lockfile
    /// left unchanged.
    pub(crate) fn classify_resolver_failure(
        &mut self,
        error: HelperError,
        lockfile: &DependencyFile,
    ) -> Result<(), UpdateError> {
        let Some(message) = error.failure_message().map(str::to_string) else {
            return Err(error.into());
        };

        // A manifest without a usable name or version, or a git dependency
        // whose files do not exist
        if INVALID_PACKAGE_RE.is_match(&message)
            || message.contains("refers to a non-existing file")
        {
            return Err(self.resolution_failure(&message, lockfile));
        }

        // A package the resolver could not fetch at all
        if let Some(missing) = missing_package(&message) {
            return self.handle_missing_package(&missing, lockfile);
        }

        // Version listings lag behind multi-package publishes, so a missing
        // version for one of the operation's own names is registry
        // inconsistency when the tree resolved fine before the update
        if message.starts_with("Couldn't find any versions")
            && self.dependencies_in_error_message(&message)
            && self.resolvable_before_update(lockfile)?
        {
            return Err(UpdateError::inconsistent_registry(message));
        }

        if message.contains("Workspaces can only be enabled in private projects") {
            return Err(UpdateError::not_evaluatable(message));
        }

        if let Some(captures) = UNREACHABLE_GIT_RE.captures(&message) {
            return Err(UpdateError::git_unreachable(&captures[1]));
        }

        if let Some(captures) = TIMEOUT_FETCHING_RE.captures(&message) {
            return self.handle_fetch_timeout(&captures[1], &captures[2], lockfile);
        }

        // Version lookup failures are only ours to report when the tree was
        // already broken before the update; otherwise the update itself
        // caused them and the raw failure has to surface
        if (message.starts_with("Couldn't find any versions")
            || message.contains(": Not found"))
            && !self.resolvable_before_update(lockfile)?
        {
            return Err(self.resolution_failure(&message, lockfile));
        }

        Err(error.into())
    }

    fn handle_missing_package(
        &self,
        missing: &MissingPackage,
        lockfile: &DependencyFile,
    ) -> Result<(), UpdateError> {
        if !self.known_dependency(&missing.name, lockfile) {
            return Err(self.resolution_failure(&missing.message, lockfile));
        }

        let registry = registry::sanitized_registry(&registry::registry_for(
            &missing.name,
            &self.credentials,
            &self.files,
        ));
        // The central registry answering "not found" for a public unscoped
        // package is noise, not an auth problem
        if registry::central_registry(&registry) && !missing.name.starts_with('@') {
            return Ok(());
        }
        Err(UpdateError::private_auth_failure(registry))
    }

    fn handle_fetch_timeout(
        &self,
        url: &str,
        package: &str,
        lockfile: &DependencyFile,
    ) -> Result<(), UpdateError> {
        if registry::central_registry(url) {
            return Ok(());
        }
        let name = decode_package_name(package);
        if !self.known_dependency(&name, lockfile) {
            return Ok(());
        }
        Err(UpdateError::private_timeout(registry::strip_scheme(url)))
    }

    /// Whether a package appears in a fresh parse of the lockfile or any
    /// manifest's dependency sections
    fn known_dependency(&self, name: &str, lockfile: &DependencyFile) -> bool {
        if lockfile::parse(&lockfile.content)
            .iter()
            .any(|entry| entry.name == name)
        {
            return true;
        }
        self.files
            .iter()
            .filter(|file| file.is_manifest())
            .flat_map(|file| manifest::requirement_entries(&file.content))
            .any(|entry| entry.name == name)
    }

    /// Whether the message references one of the operation's dependencies,
    /// matching scoped packages by their scope so a sibling published
    /// moments later still counts
    fn dependencies_in_error_message(&self, message: &str) -> bool {
        self.dependencies.iter().any(|dependency| {
            let prefix = dependency
                .name
                .split('/')
                .next()
                .unwrap_or(&dependency.name);
            message.contains(&format!("\"{}\"", prefix))
                || message.contains(&format!("\"{}/", prefix))
        })
    }

    fn resolution_failure(&self, message: &str, lockfile: &DependencyFile) -> UpdateError {
        let names: Vec<&str> = self
            .dependencies
            .iter()
            .map(|dependency| dependency.name.as_str())
            .collect();
        UpdateError::not_resolvable(format!(
            "failed to update {} in {}: {}",
            names.join(", "),
            lockfile.name,
            message
        ))
    }
}

/// A package name extracted from a failure message, with the message
/// rewritten to use the decoded name
struct MissingPackage {
    name: String,
    message: String,
}

fn missing_package(message: &str) -> Option<MissingPackage> {
    let raw = package_requirement(message).or_else(|| not_found_segment(message))?;
    let name = decode_package_name(&raw);
    let message = message.replace(&raw, &name);
    Some(MissingPackage { name, message })
}

/// Extracts the package from a `Couldn't find package "name@req"` message
fn package_requirement(message: &str) -> Option<String> {
    if !message.contains("Couldn't find package") {
        return None;
    }
    let captures = PACKAGE_REQUIREMENT_RE.captures(message)?;
    Some(lockfile::specifier_name(captures.get(1)?.as_str()).to_string())
}

/// Extracts the package from a `.../name: Not found` message
fn not_found_segment(message: &str) -> Option<String> {
    let captures = PACKAGE_NOT_FOUND_RE.captures(message)?;
    Some(captures.get(1)?.as_str().to_string())
}

fn decode_package_name(name: &str) -> String {
    name.replace("%2f", "/").replace("%2F", "/")
}
