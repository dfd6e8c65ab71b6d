//! Temporary workspace staging
//!
//! This module provides:
//! - An RAII workspace holding transformed copies of the project files
//! - Lockfile preparation for top-level and transitive update modes
//!
//! The staged tree mirrors the project's relative directory structure so
//! the resolver sees workspace manifests where it expects them. The whole
//! tree is deleted when the workspace guard drops.

use crate::domain::{Credential, Dependency, DependencyFile};
use crate::error::WorkspaceError;
use crate::lockfile;
use crate::manifest;
use crate::registry;
use crate::transform::{remove_workspace_path_prefixes, sanitize_manifest_content, SshSourceSwap};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A staged copy of the project in a temporary directory
#[derive(Debug)]
pub struct StagedWorkspace {
    dir: TempDir,
}

impl StagedWorkspace {
    /// Stages manifests, lockfiles, and auth config for one resolver run.
    ///
    /// Lockfiles are written verbatim when any top-level dependency is
    /// targeted; otherwise each transitive target's entry blocks are
    /// removed so the resolver re-resolves them. Manifests are optionally
    /// rewritten with the updated constraints, then passed through the
    /// forward transform pipeline.
    pub fn stage(
        files: &[DependencyFile],
        dependencies: &[Dependency],
        credentials: &[Credential],
        swap: &SshSourceSwap,
        rewrite_manifests: bool,
    ) -> Result<Self, WorkspaceError> {
        let dir = tempfile::Builder::new()
            .prefix("relock-workspace-")
            .tempdir()
            .map_err(|source| WorkspaceError::io("staged workspace", source))?;
        let workspace = Self { dir };

        let has_top_level = dependencies.iter().any(|d| d.top_level);
        let transitive_names: Vec<&str> = dependencies
            .iter()
            .filter(|d| !d.top_level)
            .map(|d| d.name.as_str())
            .collect();

        for file in files.iter().filter(|f| f.is_lockfile()) {
            let content = if has_top_level {
                file.content.clone()
            } else {
                let mut content = file.content.clone();
                for name in &transitive_names {
                    content = lockfile::remove_dependency_blocks(&content, name);
                }
                content
            };
            workspace.write_file(&file.name, &content)?;
        }

        for file in files.iter().filter(|f| f.is_manifest()) {
            let content = if rewrite_manifests {
                manifest::updated_manifest_content(file, dependencies)?
            } else {
                file.content.clone()
            };
            let content = swap.forward(&content);
            let content = sanitize_manifest_content(&content);
            let content = remove_workspace_path_prefixes(&file.name, &content)?;
            workspace.write_file(&file.name, &content)?;
        }

        workspace.write_file(".npmrc", &registry::npmrc_content(credentials))?;

        Ok(workspace)
    }

    /// Root of the staged tree
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory the resolver should run in for a lockfile
    pub fn workdir_for(&self, lockfile: &DependencyFile) -> PathBuf {
        let dir = lockfile.dir_name();
        if dir.is_empty() {
            self.path().to_path_buf()
        } else {
            self.path().join(dir)
        }
    }

    fn write_file(&self, name: &str, content: &str) -> Result<(), WorkspaceError> {
        let target = self.path().join(name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| WorkspaceError::io(parent, source))?;
        }
        fs::write(&target, content).map_err(|source| WorkspaceError::io(&target, source))
    }
}
