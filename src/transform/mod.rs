//! Content transforms applied around resolver invocations
//!
//! This module provides:
//! - SSH git source swapping, forward before staging and reverse after
//! - Workspace path prefix removal for manifests
//! - Manifest sanitization for content the resolver cannot parse
//! - Integrity line policy for resolver output

pub mod git_urls;
pub mod integrity;
pub mod sanitize;
pub mod workspaces;

pub use git_urls::SshSourceSwap;
pub use integrity::{integrity_lines_in_use, remove_integrity_lines};
pub use sanitize::sanitize_manifest_content;
pub use workspaces::remove_workspace_path_prefixes;
