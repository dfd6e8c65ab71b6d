//! Resolver helper subprocess bridge
//!
//! This module provides:
//! - The HelperRunner trait for invoking resolver helper functions
//! - A Node.js implementation speaking a JSON stdin/stdout protocol

use crate::error::HelperError;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Trait for invoking functions of the resolver helper
pub trait HelperRunner {
    /// Run a helper function in the specified directory with extra
    /// environment variables set on the child process
    fn run(
        &self,
        function: &str,
        args: &[Value],
        working_dir: &Path,
        env: &[(String, String)],
    ) -> Result<Value, HelperError>;
}

/// Helper runner that executes the real Node.js helper script
#[derive(Debug, Clone)]
pub struct NodeHelper {
    script: PathBuf,
}

impl NodeHelper {
    /// Creates a runner for the given helper script
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl HelperRunner for NodeHelper {
    fn run(
        &self,
        function: &str,
        args: &[Value],
        working_dir: &Path,
        env: &[(String, String)],
    ) -> Result<Value, HelperError> {
        let program = format!("node {}", self.script.display());
        let mut child = Command::new("node")
            .arg(&self.script)
            .arg(function)
            .current_dir(working_dir)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| HelperError::spawn(program.clone(), source))?;

        let request = serde_json::json!({ "function": function, "args": args });
        if let Some(mut stdin) = child.stdin.take() {
            // A write failure here means the helper already exited; the
            // status handling below reports what it said.
            let _ = stdin.write_all(request.to_string().as_bytes());
        }

        let output = child.wait_with_output().map_err(|source| {
            HelperError::protocol(format!("failed to read helper output: {}", source))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            let response: Value = serde_json::from_str(&stdout).map_err(|e| {
                HelperError::protocol(format!("invalid JSON from helper: {}", e))
            })?;
            match response.get("result") {
                Some(result) => Ok(result.clone()),
                None => Err(HelperError::protocol("helper response missing result")),
            }
        } else {
            Err(HelperError::subprocess_failed(failure_message(
                &stdout,
                &stderr,
                output.status.code(),
            )))
        }
    }
}

/// Extracts the failure message from a failed helper invocation
fn failure_message(stdout: &str, stderr: &str, code: Option<i32>) -> String {
    if let Ok(response) = serde_json::from_str::<Value>(stdout) {
        if let Some(error) = response.get("error").and_then(Value::as_str) {
            return error.to_string();
        }
    }
    if !stderr.trim().is_empty() {
        return stderr.trim().to_string();
    }
    if !stdout.trim().is_empty() {
        return stdout.trim().to_string();
    }
    match code {
        Some(code) => format!("helper exited with status {}", code),
        None => "helper terminated by signal".to_string(),
    }
}
