//! End-to-end tests for the relock CLI
//!
//! These tests verify:
//! - Exit codes for missing inputs and bad arguments
//! - The full resolve flow against a stub resolver helper
//! - JSON output schema
//!
//! Tests that drive the resolver flow need a Node.js runtime on PATH and
//! return early when none is available.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture directory creation helper
fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Whether a Node.js runtime is available on PATH
fn node_available() -> bool {
    std::process::Command::new("node")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Create a project with one declared dependency locked at 1.2.0
fn write_project(dir: &Path) {
    let package_json = r#"{
  "name": "demo",
  "version": "1.0.0",
  "dependencies": {
    "left-pad": "^1.0.0"
  }
}
"#;
    fs::write(dir.join("package.json"), package_json).unwrap();

    let yarn_lock = "# yarn lockfile v1\n\n\nleft-pad@^1.0.0:\n  version \"1.2.0\"\n  resolved \"https://registry.yarnpkg.com/left-pad/-/left-pad-1.2.0.tgz#abc\"\n";
    fs::write(dir.join("yarn.lock"), yarn_lock).unwrap();
}

/// Write a stub resolver helper that bumps every 1.2.0 in the staged
/// lockfile to 1.3.0
fn write_bumping_helper(dir: &Path) -> PathBuf {
    let script = dir.join("helper.js");
    let body = r#"let input = '';
process.stdin.on('data', (chunk) => (input += chunk));
process.stdin.on('end', () => {
  const fs = require('fs');
  const lock = fs.readFileSync('yarn.lock', 'utf8');
  const updated = lock.split('1.2.0').join('1.3.0');
  process.stdout.write(JSON.stringify({ result: { 'yarn.lock': updated } }));
});
"#;
    fs::write(&script, body).unwrap();
    script
}

/// Write a stub resolver helper that fails with the given message
fn write_failing_helper(dir: &Path, message: &str) -> PathBuf {
    let script = dir.join("failing-helper.js");
    let body = format!(
        r#"process.stdin.on('data', () => {{}});
process.stdin.on('end', () => {{
  process.stdout.write(JSON.stringify({{ error: {} }}));
  process.exit(1);
}});
"#,
        serde_json::to_string(message).unwrap()
    );
    fs::write(&script, body).unwrap();
    script
}

mod argument_handling {
    use super::*;

    /// Test that at least one update or subdependency target is required
    #[test]
    fn test_requires_target_flag() {
        Command::cargo_bin("relock")
            .unwrap()
            .assert()
            .failure()
            .stderr(predicate::str::contains("required"));
    }

    /// Test that malformed update targets are rejected at parse time
    #[test]
    fn test_rejects_malformed_update_spec() {
        Command::cargo_bin("relock")
            .unwrap()
            .args(["--update", "left-pad"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("expected name@version"));
    }

    /// Test that malformed registry tokens are rejected at parse time
    #[test]
    fn test_rejects_malformed_registry_token() {
        Command::cargo_bin("relock")
            .unwrap()
            .args(["--update", "left-pad@1.3.0", "--registry-token", "no-token"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("expected host=token"));
    }
}

mod missing_inputs {
    use super::*;

    /// Test the exit code and message when package.json is absent
    #[test]
    fn test_missing_manifest_exits_one() {
        let temp_dir = create_test_dir();

        Command::cargo_bin("relock")
            .unwrap()
            .args(["--update", "left-pad@1.3.0"])
            .arg(temp_dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error:"))
            .stderr(predicate::str::contains("package.json"));
    }

    /// Test the exit code and message when yarn.lock is absent
    #[test]
    fn test_missing_lockfile_exits_one() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("package.json"), "{}").unwrap();

        Command::cargo_bin("relock")
            .unwrap()
            .args(["--update", "left-pad@1.3.0"])
            .arg(temp_dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("yarn.lock"));
    }

    /// Test that updating a dependency the manifest does not declare fails
    #[test]
    fn test_unknown_dependency_exits_one() {
        let temp_dir = create_test_dir();
        write_project(temp_dir.path());

        Command::cargo_bin("relock")
            .unwrap()
            .args(["--update", "ghost-pkg@9.0.0"])
            .arg(temp_dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("not declared in package.json"));
    }
}

mod resolve_flow {
    use super::*;

    /// Test that the resolved lockfile is printed to stdout by default and
    /// the file on disk stays untouched
    #[test]
    fn test_prints_resolved_lockfile_to_stdout() {
        if !node_available() {
            return;
        }
        let temp_dir = create_test_dir();
        write_project(temp_dir.path());
        let helper = write_bumping_helper(temp_dir.path());

        Command::cargo_bin("relock")
            .unwrap()
            .args(["--update", "left-pad@1.3.0", "--helper"])
            .arg(&helper)
            .arg(temp_dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("version \"1.3.0\""));

        let on_disk = fs::read_to_string(temp_dir.path().join("yarn.lock")).unwrap();
        assert!(
            on_disk.contains("1.2.0"),
            "yarn.lock should not be modified without --write"
        );
    }

    /// Test that --write applies the resolved lockfile in place
    #[test]
    fn test_write_applies_in_place() {
        if !node_available() {
            return;
        }
        let temp_dir = create_test_dir();
        write_project(temp_dir.path());
        let helper = write_bumping_helper(temp_dir.path());

        Command::cargo_bin("relock")
            .unwrap()
            .args(["--update", "left-pad@1.3.0", "--write", "--helper"])
            .arg(&helper)
            .arg(temp_dir.path())
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let on_disk = fs::read_to_string(temp_dir.path().join("yarn.lock")).unwrap();
        assert!(on_disk.contains("version \"1.3.0\""));
    }

    /// Test the JSON output schema for a successful update
    #[test]
    fn test_json_output_schema() {
        if !node_available() {
            return;
        }
        let temp_dir = create_test_dir();
        write_project(temp_dir.path());
        let helper = write_bumping_helper(temp_dir.path());

        let output = Command::cargo_bin("relock")
            .unwrap()
            .args(["--update", "left-pad@1.3.0", "--json", "--helper"])
            .arg(&helper)
            .arg(temp_dir.path())
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["lockfile"], "yarn.lock");
        assert_eq!(json["status"], "updated");
        assert_eq!(json["applied"], false);
        assert_eq!(json["requested"][0], "left-pad@1.3.0");
        assert!(json["content"].as_str().unwrap().contains("1.3.0"));
    }

    /// Test that a benign registry miss leaves the lockfile alone and exits
    /// with success
    #[test]
    fn test_benign_failure_is_a_noop() {
        if !node_available() {
            return;
        }
        let temp_dir = create_test_dir();
        write_project(temp_dir.path());
        let helper = write_failing_helper(
            temp_dir.path(),
            "https://registry.yarnpkg.com/left-pad: Not found",
        );

        Command::cargo_bin("relock")
            .unwrap()
            .args(["--update", "left-pad@1.3.0", "--helper"])
            .arg(&helper)
            .arg(temp_dir.path())
            .assert()
            .success()
            .stderr(predicate::str::contains("left yarn.lock unchanged"));

        let on_disk = fs::read_to_string(temp_dir.path().join("yarn.lock")).unwrap();
        assert!(on_disk.contains("1.2.0"));
    }

    /// Test that a classified failure prints its category to stderr and
    /// exits with status 2
    #[test]
    fn test_classified_failure_exits_two() {
        if !node_available() {
            return;
        }
        let temp_dir = create_test_dir();
        write_project(temp_dir.path());
        let helper = write_failing_helper(
            temp_dir.path(),
            "Workspaces can only be enabled in private projects.",
        );

        Command::cargo_bin("relock")
            .unwrap()
            .args(["--update", "left-pad@1.3.0", "--helper"])
            .arg(&helper)
            .arg(temp_dir.path())
            .assert()
            .code(2)
            .stderr(predicate::str::contains("error[not_evaluatable]"));
    }

    /// Test that quiet mode suppresses status output on success
    #[test]
    fn test_quiet_mode_suppresses_status() {
        if !node_available() {
            return;
        }
        let temp_dir = create_test_dir();
        write_project(temp_dir.path());
        let helper = write_bumping_helper(temp_dir.path());

        Command::cargo_bin("relock")
            .unwrap()
            .args(["--update", "left-pad@1.3.0", "--write", "--quiet", "--helper"])
            .arg(&helper)
            .arg(temp_dir.path())
            .assert()
            .success()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::is_empty());
    }
}
