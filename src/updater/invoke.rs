//! Resolver helper invocation
//!
//! This module provides:
//! - Staging plus helper execution for the current and previous dependency
//!   state, in top-level update or subdependency re-resolution mode
//! - Retry handling for transient resolver failures

use crate::domain::{Dependency, DependencyFile, Requirement};
use crate::error::{HelperError, UpdateError};
use crate::git_config::GitConfigScope;
use crate::stage::StagedWorkspace;
use crate::updater::LockfileUpdater;
use rand::Rng;
use serde_json::Value;
use std::ops::Range;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Maximum number of resolver attempts for a transient failure
const MAX_ATTEMPTS: u32 = 3;

/// Seconds slept between attempts, sampled uniformly
const RETRY_DELAY_SECS: Range<f64> = 3.0..10.0;

/// Failure markers that warrant another attempt
const TRANSIENT_FAILURES: [&str; 3] = ["registry may be down", "ETIMEDOUT", "ENOBUFS"];

impl LockfileUpdater {
    /// Resolves the update and returns the new content for one lockfile
    pub(crate) fn current_lockfile_update(
        &self,
        lockfile: &DependencyFile,
    ) -> Result<String, UpdateError> {
        let staged = StagedWorkspace::stage(
            &self.files,
            &self.dependencies,
            &self.credentials,
            &self.swap,
            true,
        )?;
        let response = self.invoke_resolver(&staged, lockfile, &self.dependencies)?;
        lockfile_content_from(&response, lockfile)
    }

    /// Resolves the project as it stood before the update, discarding the
    /// resulting content
    pub(crate) fn previous_state_resolution(
        &self,
        lockfile: &DependencyFile,
    ) -> Result<(), UpdateError> {
        let previous = previous_state(&self.dependencies);
        let staged =
            StagedWorkspace::stage(&self.files, &previous, &self.credentials, &self.swap, false)?;
        self.invoke_resolver(&staged, lockfile, &previous)?;
        Ok(())
    }

    /// Runs the helper against a staged workspace with git credentials
    /// configured for the duration of the call
    fn invoke_resolver(
        &self,
        staged: &StagedWorkspace,
        lockfile: &DependencyFile,
        dependencies: &[Dependency],
    ) -> Result<Value, UpdateError> {
        let git_config = GitConfigScope::new(&self.credentials)?;
        let env = git_config.env_vars();
        let workdir = staged.workdir_for(lockfile);

        let updates = top_level_updates(dependencies, lockfile.dir_name());
        let (function, payload) = if updates.is_empty() {
            (
                "updateSubdependency",
                Value::String(lockfile.base_name().to_string()),
            )
        } else {
            ("update", Value::Array(updates))
        };
        let args = [
            Value::String(workdir.to_string_lossy().into_owned()),
            payload,
        ];

        let response = self.run_resolver_with_retries(function, &args, &workdir, &env)?;
        Ok(response)
    }

    fn run_resolver_with_retries(
        &self,
        function: &str,
        args: &[Value],
        workdir: &Path,
        env: &[(String, String)],
    ) -> Result<Value, HelperError> {
        let mut attempt = 1;
        loop {
            match self.helper.run(function, args, workdir, env) {
                Ok(response) => return Ok(response),
                Err(error) => {
                    let retryable = error
                        .failure_message()
                        .is_some_and(|message| self.transient_failure(message));
                    if !retryable || attempt >= MAX_ATTEMPTS {
                        return Err(error);
                    }
                    attempt += 1;
                    thread::sleep(self.next_retry_delay());
                }
            }
        }
    }

    /// Whether a failure message indicates a condition worth retrying.
    ///
    /// A lookup miss for one of the operation's own packages counts: right
    /// after a publish the registry can briefly answer as if the package
    /// did not exist.
    fn transient_failure(&self, message: &str) -> bool {
        if TRANSIENT_FAILURES
            .iter()
            .any(|marker| message.contains(marker))
        {
            return true;
        }
        self.dependencies
            .iter()
            .any(|dependency| message.contains(&format!("find package \"{}", dependency.name)))
    }

    fn next_retry_delay(&self) -> Duration {
        match self.retry_delay {
            Some(delay) => delay,
            None => Duration::from_secs_f64(rand::thread_rng().gen_range(RETRY_DELAY_SECS)),
        }
    }
}

/// Maps the dependency set onto its state before the update
fn previous_state(dependencies: &[Dependency]) -> Vec<Dependency> {
    dependencies
        .iter()
        .map(|dependency| Dependency {
            name: dependency.name.clone(),
            version: dependency.previous_version.clone(),
            previous_version: None,
            requirements: dependency.previous_requirements.clone(),
            previous_requirements: Vec::new(),
            top_level: dependency.top_level,
            removed: false,
        })
        .collect()
}

/// Builds the `update` payload for every top-level dependency that is not
/// being removed
fn top_level_updates(dependencies: &[Dependency], dir: &str) -> Vec<Value> {
    dependencies
        .iter()
        .filter(|d| d.top_level && !d.removed)
        .map(|d| {
            serde_json::json!({
                "name": d.name,
                "version": d.version,
                "requirements": requirements_for_path(&d.requirements, dir),
            })
        })
        .collect()
}

/// Scopes requirements to a lockfile directory, stripping the directory
/// prefix from their file paths
fn requirements_for_path(requirements: &[Requirement], dir: &str) -> Vec<Requirement> {
    if dir.is_empty() {
        return requirements.to_vec();
    }
    let prefix = format!("{}/", dir);
    requirements
        .iter()
        .filter(|r| r.file.starts_with(&prefix))
        .map(|r| {
            let mut scoped = r.clone();
            scoped.file = r.file[prefix.len()..].to_string();
            scoped
        })
        .collect()
}

fn lockfile_content_from(
    response: &Value,
    lockfile: &DependencyFile,
) -> Result<String, UpdateError> {
    response
        .get(lockfile.base_name())
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            HelperError::protocol(format!(
                "helper response missing content for {}",
                lockfile.base_name()
            ))
            .into()
        })
}
