//! Dependency file records

use serde::{Deserialize, Serialize};

/// A manifest or lockfile supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyFile {
    /// Path of the file relative to the project root, e.g.
    /// "packages/app/package.json"
    pub name: String,
    /// Full text content
    pub content: String,
    /// Directory the project was fetched from, "/" unless the project lives
    /// in a subdirectory of its repository
    pub directory: String,
}

impl DependencyFile {
    /// Creates a new dependency file at the repository root
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            directory: "/".to_string(),
        }
    }

    /// Sets the project directory (builder pattern)
    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Returns the final path component, e.g. "yarn.lock"
    pub fn base_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Returns the directory part of the name, "" for files at the root
    pub fn dir_name(&self) -> &str {
        match self.name.rfind('/') {
            Some(idx) => &self.name[..idx],
            None => "",
        }
    }

    /// Whether this file is a package.json manifest
    pub fn is_manifest(&self) -> bool {
        self.base_name() == "package.json"
    }

    /// Whether this file is a yarn.lock lockfile
    pub fn is_lockfile(&self) -> bool {
        self.base_name() == "yarn.lock"
    }
}
