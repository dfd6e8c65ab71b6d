//! Lockfile update coordination
//!
//! This module provides:
//! - The LockfileUpdater driving staging, resolution, and classification
//! - Memoized update results and pre-update resolvability probes
//! - Post-processing of resolver output back into repository form

mod classify;
mod invoke;
#[cfg(test)]
pub(crate) mod testing;

use crate::domain::{Credential, Dependency, DependencyFile};
use crate::error::{HelperError, UpdateError};
use crate::helper::HelperRunner;
use crate::transform::{self, SshSourceSwap};
use std::collections::HashMap;
use std::time::Duration;

/// Computes updated yarn.lock content for a set of dependency changes
///
/// One instance handles one update operation. Results are memoized per
/// lockfile name, so repeated calls for the same lockfile run the resolver
/// once.
pub struct LockfileUpdater {
    files: Vec<DependencyFile>,
    dependencies: Vec<Dependency>,
    credentials: Vec<Credential>,
    helper: Box<dyn HelperRunner>,
    swap: SshSourceSwap,
    retry_delay: Option<Duration>,
    updated_content: HashMap<String, Option<String>>,
    resolvability: HashMap<String, bool>,
}

impl LockfileUpdater {
    /// Creates a new updater for the given project files and update targets
    pub fn new(
        files: Vec<DependencyFile>,
        dependencies: Vec<Dependency>,
        credentials: Vec<Credential>,
        helper: Box<dyn HelperRunner>,
    ) -> Self {
        let swap = SshSourceSwap::from_files(&files);
        Self {
            files,
            dependencies,
            credentials,
            helper,
            swap,
            retry_delay: None,
            updated_content: HashMap::new(),
            resolvability: HashMap::new(),
        }
    }

    /// Overrides the randomized backoff between retried resolver runs
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Returns the updated content for one lockfile.
    ///
    /// `Ok(Some(content))` carries the re-resolved lockfile, `Ok(None)`
    /// means the resolver failed in a way that is benign (the lockfile is
    /// left unchanged), and `Err` carries a classified failure. Both `Ok`
    /// outcomes are memoized; errors are recomputed on each call.
    pub fn updated_lockfile_content(
        &mut self,
        lockfile: &DependencyFile,
    ) -> Result<Option<String>, UpdateError> {
        if let Some(cached) = self.updated_content.get(&lockfile.name) {
            return Ok(cached.clone());
        }

        let updated = match self.current_lockfile_update(lockfile) {
            Ok(content) => Some(self.post_process(&content)),
            Err(UpdateError::Helper(error)) => {
                self.classify_resolver_failure(error, lockfile)?;
                None
            }
            Err(other) => return Err(other),
        };

        self.updated_content
            .insert(lockfile.name.clone(), updated.clone());
        Ok(updated)
    }

    /// Whether the dependency tree resolved before this update was applied.
    ///
    /// Stages the project with its previous versions and requirements, the
    /// manifests left as committed, and runs the resolver once. A resolver
    /// failure means the tree was already broken.
    pub fn resolvable_before_update(
        &mut self,
        lockfile: &DependencyFile,
    ) -> Result<bool, UpdateError> {
        if let Some(&resolvable) = self.resolvability.get(&lockfile.name) {
            return Ok(resolvable);
        }

        let resolvable = match self.previous_state_resolution(lockfile) {
            Ok(()) => true,
            Err(UpdateError::Helper(HelperError::SubprocessFailed { .. })) => false,
            Err(other) => return Err(other),
        };

        self.resolvability.insert(lockfile.name.clone(), resolvable);
        Ok(resolvable)
    }

    /// Reverses the staging transforms on resolver output
    fn post_process(&self, content: &str) -> String {
        let content = self.swap.reverse(content);
        if transform::integrity_lines_in_use(&self.files) {
            content
        } else {
            transform::remove_integrity_lines(&content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedHelper;
    use super::*;
    use serde_json::json;

    fn manifest_content() -> &'static str {
        r#"{
  "name": "fixture",
  "version": "1.0.0",
  "dependencies": {
    "left-pad": "^1.0.0"
  }
}
"#
    }

    fn lockfile_content() -> &'static str {
        "# yarn lockfile v1\n\n\nleft-pad@^1.0.0:\n  version \"1.2.0\"\n  resolved \"https://registry.yarnpkg.com/left-pad/-/left-pad-1.2.0.tgz#5b8a3a7765dfe001146efef998f3332e8e1609b1\"\n"
    }

    fn project_files() -> Vec<DependencyFile> {
        vec![
            DependencyFile::new("package.json", manifest_content()),
            DependencyFile::new("yarn.lock", lockfile_content()),
        ]
    }

    fn left_pad_update() -> Vec<Dependency> {
        vec![Dependency::top_level("left-pad", "1.3.0")
            .with_previous_version("1.2.0")
            .with_requirement(crate::domain::Requirement::new(
                "package.json",
                Some("^1.3.0".to_string()),
                vec!["dependencies".to_string()],
            ))
            .with_previous_requirement(crate::domain::Requirement::new(
                "package.json",
                Some("^1.0.0".to_string()),
                vec!["dependencies".to_string()],
            ))]
    }

    fn updater_with(helper: ScriptedHelper) -> LockfileUpdater {
        LockfileUpdater::new(
            project_files(),
            left_pad_update(),
            Vec::new(),
            Box::new(helper),
        )
        .with_retry_delay(Duration::ZERO)
    }

    #[test]
    fn test_updated_content_memoized() {
        let (helper, calls) = ScriptedHelper::new(vec![Ok(
            json!({ "yarn.lock": "left-pad@^1.3.0:\n  version \"1.3.0\"\n" }),
        )]);
        let mut updater = updater_with(helper);
        let lockfile = DependencyFile::new("yarn.lock", lockfile_content());

        let first = updater.updated_lockfile_content(&lockfile).unwrap();
        let second = updater.updated_lockfile_content(&lockfile).unwrap();

        assert_eq!(first, second);
        assert!(first.unwrap().contains("1.3.0"));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_swallowed_failure_memoized() {
        // left-pad lives on the central registry and is unscoped, so a
        // lookup miss is benign
        let (helper, calls) = ScriptedHelper::new(vec![Err(
            "https://registry.yarnpkg.com/left-pad: Not found".to_string(),
        )]);
        let mut updater = updater_with(helper);
        let lockfile = DependencyFile::new("yarn.lock", lockfile_content());

        assert!(updater.updated_lockfile_content(&lockfile).unwrap().is_none());
        assert!(updater.updated_lockfile_content(&lockfile).unwrap().is_none());
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_failed_update_recomputed() {
        let message = "Couldn't find package \"@scope/name@^2.0.0\"".to_string();
        let (helper, calls) = ScriptedHelper::new(vec![Err(message.clone()), Err(message)]);
        let mut updater = updater_with(helper);
        let lockfile = DependencyFile::new("yarn.lock", lockfile_content());

        let err = updater.updated_lockfile_content(&lockfile).unwrap_err();
        assert!(matches!(err, UpdateError::NotResolvable { .. }));
        let err = updater.updated_lockfile_content(&lockfile).unwrap_err();
        assert!(matches!(err, UpdateError::NotResolvable { .. }));
        assert_eq!(calls.borrow().len(), 2);
    }

    #[test]
    fn test_post_process_removes_added_integrity_lines() {
        let response = "left-pad@^1.3.0:\n  version \"1.3.0\"\n  resolved \"https://registry.yarnpkg.com/left-pad/-/left-pad-1.3.0.tgz#abc\"\n  integrity sha512-mvGeYWnar\n";
        let (helper, _calls) = ScriptedHelper::new(vec![Ok(json!({ "yarn.lock": response }))]);
        let mut updater = updater_with(helper);
        let lockfile = DependencyFile::new("yarn.lock", lockfile_content());

        let updated = updater.updated_lockfile_content(&lockfile).unwrap().unwrap();
        assert!(!updated.contains("integrity sha"));
        assert!(updated.contains("version \"1.3.0\""));
    }

    #[test]
    fn test_post_process_keeps_integrity_lines_when_in_use() {
        let original = "left-pad@^1.0.0:\n  version \"1.2.0\"\n  resolved \"https://registry.yarnpkg.com/left-pad/-/left-pad-1.2.0.tgz#abc\"\n  integrity sha512-original\n";
        let response = "left-pad@^1.3.0:\n  version \"1.3.0\"\n  resolved \"https://registry.yarnpkg.com/left-pad/-/left-pad-1.3.0.tgz#def\"\n  integrity sha512-updated\n";
        let files = vec![
            DependencyFile::new("package.json", manifest_content()),
            DependencyFile::new("yarn.lock", original),
        ];
        let (helper, _calls) = ScriptedHelper::new(vec![Ok(json!({ "yarn.lock": response }))]);
        let mut updater =
            LockfileUpdater::new(files, left_pad_update(), Vec::new(), Box::new(helper));
        let lockfile = DependencyFile::new("yarn.lock", original);

        let updated = updater.updated_lockfile_content(&lockfile).unwrap().unwrap();
        assert!(updated.contains("integrity sha512-updated"));
    }

    #[test]
    fn test_post_process_restores_ssh_sources() {
        let manifest = r#"{
  "name": "fixture",
  "version": "1.0.0",
  "dependencies": {
    "internal-lib": "git+ssh://git@github.com/acme/internal-lib.git#semver:^1.0.0"
  }
}
"#;
        let response = "internal-lib@^1.0.0:\n  version \"1.4.0\"\n  resolved \"https://github.com/acme/internal-lib.git#0123456\"\n";
        let files = vec![
            DependencyFile::new("package.json", manifest),
            DependencyFile::new("yarn.lock", ""),
        ];
        let (helper, _calls) = ScriptedHelper::new(vec![Ok(json!({ "yarn.lock": response }))]);
        let dependency = Dependency::top_level("internal-lib", "1.4.0");
        let mut updater =
            LockfileUpdater::new(files, vec![dependency], Vec::new(), Box::new(helper));
        let lockfile = DependencyFile::new("yarn.lock", "");

        let updated = updater.updated_lockfile_content(&lockfile).unwrap().unwrap();
        assert!(updated.contains("git+ssh://git@github.com/acme/internal-lib.git#0123456"));
    }

    #[test]
    fn test_resolvable_before_update_memoized() {
        let (helper, calls) = ScriptedHelper::new(vec![Err("does not resolve".to_string())]);
        let mut updater = updater_with(helper);
        let lockfile = DependencyFile::new("yarn.lock", lockfile_content());

        assert!(!updater.resolvable_before_update(&lockfile).unwrap());
        assert!(!updater.resolvable_before_update(&lockfile).unwrap());
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_resolvable_before_update_success() {
        let (helper, _calls) =
            ScriptedHelper::new(vec![Ok(json!({ "yarn.lock": lockfile_content() }))]);
        let mut updater = updater_with(helper);
        let lockfile = DependencyFile::new("yarn.lock", lockfile_content());

        assert!(updater.resolvable_before_update(&lockfile).unwrap());
    }

    #[test]
    fn test_response_without_lockfile_content_is_protocol_error() {
        let (helper, _calls) = ScriptedHelper::new(vec![Ok(json!({ "other.lock": "content" }))]);
        let mut updater = updater_with(helper);
        let lockfile = DependencyFile::new("yarn.lock", lockfile_content());

        let err = updater.updated_lockfile_content(&lockfile).unwrap_err();
        assert!(format!("{}", err).contains("missing content for yarn.lock"));
    }
}
