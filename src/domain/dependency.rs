//! Dependency and requirement structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a version requirement points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequirementSource {
    /// A package registry
    Registry { url: String },
    /// A git repository
    Git { url: String },
    /// A local path within the project
    Path,
}

/// A version requirement declared in one manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Manifest file the requirement appears in, relative to the project root
    pub file: String,
    /// Constraint string, None for dependencies only present in the lockfile
    pub requirement: Option<String>,
    /// Dependency groups the requirement belongs to (dependencies,
    /// devDependencies, optionalDependencies, ...)
    pub groups: Vec<String>,
    /// Source the requirement resolves against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<RequirementSource>,
}

impl Requirement {
    /// Creates a new requirement
    pub fn new(
        file: impl Into<String>,
        requirement: Option<String>,
        groups: Vec<String>,
    ) -> Self {
        Self {
            file: file.into(),
            requirement,
            groups,
            source: None,
        }
    }

    /// Sets the source for this requirement (builder pattern)
    pub fn with_source(mut self, source: RequirementSource) -> Self {
        self.source = Some(source);
        self
    }
}

/// A dependency targeted by an update operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Target version for the update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Version currently locked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
    /// Requirements after the update
    pub requirements: Vec<Requirement>,
    /// Requirements before the update
    pub previous_requirements: Vec<Requirement>,
    /// Whether the dependency is declared in a manifest (as opposed to only
    /// appearing in the lockfile as a transitive dependency)
    pub top_level: bool,
    /// Whether the update removes this dependency
    pub removed: bool,
}

impl Dependency {
    /// Creates a new top-level dependency
    pub fn top_level(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
            previous_version: None,
            requirements: Vec::new(),
            previous_requirements: Vec::new(),
            top_level: true,
            removed: false,
        }
    }

    /// Creates a new transitive dependency to be re-resolved
    pub fn transitive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            previous_version: None,
            requirements: Vec::new(),
            previous_requirements: Vec::new(),
            top_level: false,
            removed: false,
        }
    }

    /// Sets the previously locked version (builder pattern)
    pub fn with_previous_version(mut self, version: impl Into<String>) -> Self {
        self.previous_version = Some(version.into());
        self
    }

    /// Adds a post-update requirement (builder pattern)
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Adds a pre-update requirement (builder pattern)
    pub fn with_previous_requirement(mut self, requirement: Requirement) -> Self {
        self.previous_requirements.push(requirement);
        self
    }

    /// Marks the dependency as removed by this update (builder pattern)
    pub fn removed(mut self) -> Self {
        self.removed = true;
        self
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = self.version.as_deref().unwrap_or("*");
        let removed_marker = if self.removed { " (removed)" } else { "" };
        write!(f, "{}@{}{}", self.name, version, removed_marker)
    }
}
