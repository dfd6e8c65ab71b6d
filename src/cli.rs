//! CLI argument parsing module for relock

use clap::{ArgAction, ArgGroup, Parser};
use std::path::PathBuf;

/// A top-level update target given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSpec {
    /// Package name, possibly scoped
    pub name: String,
    /// Version to update to
    pub version: String,
}

/// Parse an update target in the format name@version. Scoped packages start
/// with @, so the split happens at the last @ in the string.
fn parse_update_spec(s: &str) -> Result<UpdateSpec, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty update target".to_string());
    }

    let Some(at) = s.rfind('@').filter(|&at| at > 0) else {
        return Err(format!("expected name@version, got: {}", s));
    };

    let (name, version) = (&s[..at], &s[at + 1..]);
    if version.is_empty() {
        return Err(format!("missing version in update target: {}", s));
    }

    Ok(UpdateSpec {
        name: name.to_string(),
        version: version.to_string(),
    })
}

/// A private registry credential given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryToken {
    /// Registry host, without scheme
    pub host: String,
    /// Authentication token
    pub token: String,
}

/// Parse a registry credential in the format host=token
fn parse_registry_token(s: &str) -> Result<RegistryToken, String> {
    let s = s.trim();
    let Some((host, token)) = s.split_once('=') else {
        return Err(format!("expected host=token, got: {}", s));
    };
    if host.is_empty() {
        return Err(format!("missing host in registry token: {}", s));
    }
    if token.is_empty() {
        return Err(format!("missing token in registry token: {}", s));
    }

    Ok(RegistryToken {
        host: host.to_string(),
        token: token.to_string(),
    })
}

/// Yarn lockfile re-resolver
#[derive(Parser, Debug, Clone)]
#[command(name = "relock", version, about = "Re-resolves yarn.lock after dependency updates")]
#[command(group(
    ArgGroup::new("targets")
        .required(true)
        .multiple(true)
        .args(["updates", "subdependencies"]),
))]
pub struct CliArgs {
    /// Project directory containing package.json and yarn.lock
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Top-level dependency to update, as name@version (repeatable)
    #[arg(
        short,
        long = "update",
        value_name = "NAME@VERSION",
        value_parser = parse_update_spec,
        action = ArgAction::Append
    )]
    pub updates: Vec<UpdateSpec>,

    /// Lockfile-only dependency to re-resolve within its current range (repeatable)
    #[arg(
        short,
        long = "subdependency",
        value_name = "NAME",
        action = ArgAction::Append
    )]
    pub subdependencies: Vec<String>,

    /// Node.js resolver helper script
    #[arg(long, value_name = "PATH", default_value = "helpers/run.js")]
    pub helper: PathBuf,

    /// Private registry credential, as host=token (repeatable)
    #[arg(
        long = "registry-token",
        value_name = "HOST=TOKEN",
        value_parser = parse_registry_token,
        action = ArgAction::Append
    )]
    pub registry_tokens: Vec<RegistryToken>,

    /// Write the re-resolved lockfile back instead of printing it
    #[arg(short, long)]
    pub write: bool,

    /// Emit the outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Report failures only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show per-dependency detail
    #[arg(long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Labels for the requested targets, used in status output
    pub fn target_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .updates
            .iter()
            .map(|spec| format!("{}@{}", spec.name, spec.version))
            .collect();
        labels.extend(
            self.subdependencies
                .iter()
                .map(|name| format!("{} (in range)", name)),
        );
        labels
    }
}
