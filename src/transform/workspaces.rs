//! Workspace path prefix removal
//!
//! Yarn fails to install workspaces declared with a leading `./` in their
//! glob, so the prefix is stripped from the staged manifest. Manifests
//! without a workspaces declaration pass through unchanged.

use crate::error::WorkspaceError;
use serde_json::Value;

/// Strips leading `./` from every workspace glob in a manifest
pub fn remove_workspace_path_prefixes(
    name: &str,
    content: &str,
) -> Result<String, WorkspaceError> {
    let mut json: Value = serde_json::from_str(content)
        .map_err(|e| WorkspaceError::json_parse_error(name, e.to_string()))?;

    let Some(workspaces) = json.get_mut("workspaces") else {
        return Ok(content.to_string());
    };

    match workspaces {
        Value::Array(paths) => strip_path_prefixes(paths),
        Value::Object(map) => {
            for key in ["packages", "nohoist"] {
                if let Some(Value::Array(paths)) = map.get_mut(key) {
                    strip_path_prefixes(paths);
                }
            }
        }
        _ => {
            return Err(WorkspaceError::invalid_workspaces(
                name,
                "expected an array of globs or an object",
            ));
        }
    }

    serde_json::to_string(&json).map_err(|e| WorkspaceError::json_parse_error(name, e.to_string()))
}

fn strip_path_prefixes(paths: &mut [Value]) {
    for path in paths {
        if let Value::String(s) = path {
            if let Some(stripped) = s.strip_prefix("./") {
                *s = stripped.to_string();
            }
        }
    }
}
