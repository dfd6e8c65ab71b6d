//! Format-preserving manifest rewriting
//!
//! Constraint updates are applied with targeted text replacement rather
//! than a JSON round trip so key order, indentation, and every untouched
//! byte of the manifest survive.

use crate::domain::{Dependency, DependencyFile};
use crate::error::WorkspaceError;
use regex::Regex;

/// Returns manifest content with each updated dependency's constraint
/// replaced by its new requirement
pub fn updated_manifest_content(
    file: &DependencyFile,
    dependencies: &[Dependency],
) -> Result<String, WorkspaceError> {
    let mut content = file.content.clone();

    for dependency in dependencies.iter().filter(|d| d.top_level && !d.removed) {
        let mut applied: Vec<(String, String)> = Vec::new();

        for requirement in dependency.requirements.iter().filter(|r| r.file == file.name) {
            let Some(new_req) = requirement.requirement.as_deref() else {
                continue;
            };
            let old = dependency
                .previous_requirements
                .iter()
                .find(|r| r.file == requirement.file && r.groups == requirement.groups);
            let Some(old_req) = old.and_then(|r| r.requirement.as_deref()) else {
                continue;
            };
            if old_req == new_req {
                continue;
            }
            let pair = (old_req.to_string(), new_req.to_string());
            if applied.contains(&pair) {
                continue;
            }

            content =
                replace_declaration(&content, &file.name, &dependency.name, old_req, new_req)?;
            applied.push(pair);
        }
    }

    Ok(content)
}

/// Replaces `"name": "old_req"` declarations with the new requirement,
/// tolerating flexible whitespace around the colon
fn replace_declaration(
    content: &str,
    file_name: &str,
    name: &str,
    old_req: &str,
    new_req: &str,
) -> Result<String, WorkspaceError> {
    let pattern = format!(
        r#"("{}"\s*:\s*)"{}""#,
        regex::escape(name),
        regex::escape(old_req)
    );
    let re = Regex::new(&pattern).map_err(|e| {
        WorkspaceError::declaration_update(file_name, name, format!("invalid pattern: {}", e))
    })?;

    let replacement = format!(r#"${{1}}"{}""#, new_req.replace('$', "$$"));
    let updated = re.replace_all(content, replacement.as_str()).to_string();

    if updated == content {
        return Err(WorkspaceError::declaration_update(
            file_name,
            name,
            format!("declaration \"{}\" not found", old_req),
        ));
    }
    Ok(updated)
}
