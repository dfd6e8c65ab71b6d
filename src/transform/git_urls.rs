//! SSH git source swapping
//!
//! Yarn cannot resolve `git+ssh:` sources without interactive key prompts,
//! so they are swapped to their HTTPS form before the resolver runs and
//! swapped back afterwards. The original requirement strings are cached so
//! the reverse swap restores them byte for byte.

use crate::domain::DependencyFile;
use crate::manifest;
use regex::Regex;
use std::sync::LazyLock;

static SSH_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"git\+ssh://[^@/]+@(.*?)[:/]").unwrap());

/// The set of `git+ssh:` requirements found in a project's manifests
#[derive(Debug, Clone)]
pub struct SshSourceSwap {
    requirements: Vec<String>,
}

impl SshSourceSwap {
    /// Scans every manifest's dependency sections for `git+ssh:`
    /// requirements, with any `#fragment` stripped. Manifests that do not
    /// parse yet are skipped; they are sanitized later in the pipeline.
    pub fn from_files(files: &[DependencyFile]) -> Self {
        let mut requirements: Vec<String> = Vec::new();
        for file in files.iter().filter(|f| f.is_manifest()) {
            for entry in manifest::requirement_entries(&file.content) {
                if !entry.requirement.starts_with("git+ssh:") {
                    continue;
                }
                let requirement = match entry.requirement.find('#') {
                    Some(idx) => &entry.requirement[..idx],
                    None => entry.requirement.as_str(),
                };
                if !requirements.iter().any(|r| r == requirement) {
                    requirements.push(requirement.to_string());
                }
            }
        }
        Self { requirements }
    }

    /// Replaces each cached SSH requirement with its HTTPS form
    pub fn forward(&self, content: &str) -> String {
        let mut updated = content.to_string();
        for requirement in &self.requirements {
            let swapped = SSH_URL_RE.replace(requirement, "https://$1/");
            updated = updated.replace(requirement.as_str(), &swapped);
        }
        updated
    }

    /// Restores each swapped HTTPS form to the original SSH requirement
    pub fn reverse(&self, content: &str) -> String {
        let mut updated = content.to_string();
        for requirement in &self.requirements {
            let swapped = SSH_URL_RE.replace(requirement, "https://$1/");
            updated = updated.replace(swapped.as_ref(), requirement);
        }
        updated
    }

    /// Whether any SSH requirements were found
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}
