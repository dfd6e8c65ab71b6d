//! yarn.lock v1 entry parsing
//!
//! Handles entry blocks of the form:
//!
//! ```text
//! lodash@^1.2.0, lodash@^1.3.1:
//!   version "1.3.1"
//!   resolved "https://registry.yarnpkg.com/lodash/-/lodash-1.3.1.tgz#a466..."
//! ```
//!
//! Only the fields needed for error classification are read.

use regex::Regex;
use std::sync::LazyLock;

static VERSION_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s+version\s+"?([^"\s]+)"?"#).unwrap());
static RESOLVED_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s+resolved\s+"?([^"\s]+)"?"#).unwrap());

/// One package entry of a yarn.lock file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockfileEntry {
    /// Package name
    pub name: String,
    /// Locked version
    pub version: Option<String>,
    /// URL the package resolved to
    pub resolved: Option<String>,
}

/// Parses lockfile content into entries, one per distinct package name in
/// each block header
pub fn parse(content: &str) -> Vec<LockfileEntry> {
    let mut entries = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut version: Option<String> = None;
    let mut resolved: Option<String> = None;

    for line in content.lines() {
        let trimmed = line.trim_end();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if !line.starts_with([' ', '\t']) && trimmed.ends_with(':') {
            flush(&mut names, &mut version, &mut resolved, &mut entries);
            names = header_names(trimmed);
            continue;
        }
        if let Some(caps) = VERSION_LINE_RE.captures(line) {
            version = Some(caps[1].to_string());
        } else if let Some(caps) = RESOLVED_LINE_RE.captures(line) {
            resolved = Some(caps[1].to_string());
        }
    }
    flush(&mut names, &mut version, &mut resolved, &mut entries);
    entries
}

fn flush(
    names: &mut Vec<String>,
    version: &mut Option<String>,
    resolved: &mut Option<String>,
    entries: &mut Vec<LockfileEntry>,
) {
    for name in names.drain(..) {
        entries.push(LockfileEntry {
            name,
            version: version.clone(),
            resolved: resolved.clone(),
        });
    }
    *version = None;
    *resolved = None;
}

/// Extracts the distinct package names from a block header line
fn header_names(header: &str) -> Vec<String> {
    let header = header.trim_end_matches(':');
    let mut names: Vec<String> = Vec::new();
    for spec in header.split(',') {
        let spec = spec.trim().trim_matches('"');
        let name = specifier_name(spec);
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Strips the version part from a `name@range` specifier. The split happens
/// at the first `@` preceded by a word character, so scoped names and git
/// URLs with embedded `@` survive intact.
pub fn specifier_name(specifier: &str) -> &str {
    for (idx, _) in specifier.match_indices('@') {
        if idx == 0 {
            continue;
        }
        let prev = specifier[..idx].chars().next_back();
        if prev.is_some_and(|c| c.is_alphanumeric() || c == '_') {
            return &specifier[..idx];
        }
    }
    specifier
}

/// Removes every entry block whose header starts with `<name>@`, through
/// the blank line that ends the block. Blocks not terminated by a blank
/// line are left in place.
pub fn remove_dependency_blocks(content: &str, name: &str) -> String {
    let prefix = format!("{}@", name);
    let mut result = String::with_capacity(content.len());
    let mut pending: Option<String> = None;

    for line in content.split_inclusive('\n') {
        if let Some(buffer) = pending.as_mut() {
            buffer.push_str(line);
            if line == "\n" {
                pending = None;
            }
            continue;
        }
        if line.starts_with(&prefix) {
            pending = Some(line.to_string());
            continue;
        }
        result.push_str(line);
    }
    if let Some(buffer) = pending {
        result.push_str(&buffer);
    }
    result
}
