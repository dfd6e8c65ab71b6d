//! Manifest scanning and rewriting for package.json files
//!
//! This module provides:
//! - The dependency sections scanned throughout the crate
//! - Enumeration of a manifest's requirement entries
//! - A format-preserving version constraint rewriter

mod rewriter;

pub use rewriter::updated_manifest_content;

/// Dependency sections of a package.json, in scan order
pub const DEPENDENCY_SECTIONS: [&str; 5] = [
    "dependencies",
    "devDependencies",
    "optionalDependencies",
    "peerDependencies",
    "resolutions",
];

/// A requirement found in one dependency section of a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementEntry {
    /// Section the requirement was declared in
    pub section: &'static str,
    /// Package name
    pub name: String,
    /// Requirement string as written
    pub requirement: String,
}

/// Lists every string-valued requirement in a manifest's dependency
/// sections. Manifests that do not parse yield no entries.
pub fn requirement_entries(content: &str) -> Vec<RequirementEntry> {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(content) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for section in DEPENDENCY_SECTIONS {
        let Some(deps) = json.get(section).and_then(|v| v.as_object()) else {
            continue;
        };
        for (name, requirement) in deps {
            if let Some(requirement) = requirement.as_str() {
                entries.push(RequirementEntry {
                    section,
                    name: name.clone(),
                    requirement: requirement.to_string(),
                });
            }
        }
    }
    entries
}
