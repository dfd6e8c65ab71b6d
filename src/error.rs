//! Application error types using thiserror
//!
//! Error hierarchy:
//! - UpdateError: Classified resolver failures surfaced to callers
//! - WorkspaceError: Issues staging or transforming project files
//! - HelperError: Resolver helper subprocess failures

use std::path::PathBuf;
use thiserror::Error;

/// Classified outcome of a failed lockfile update
#[derive(Error, Debug)]
pub enum UpdateError {
    /// The dependency tree cannot be resolved, before or after the update
    #[error("dependencies could not be resolved: {message}")]
    NotResolvable { message: String },

    /// The project cannot be evaluated by the resolver at all
    #[error("project cannot be evaluated: {message}")]
    NotEvaluatable { message: String },

    /// A git dependency could not be reached
    #[error("git dependency at {url} is unreachable")]
    GitUnreachable { url: String },

    /// A private registry rejected or never received our credentials
    #[error("authentication failed for registry {registry}")]
    PrivateAuthFailure { registry: String },

    /// A private registry timed out
    #[error("registry {host} timed out")]
    PrivateTimeout { host: String },

    /// The registry served version listings inconsistent with itself
    #[error("registry returned inconsistent data: {message}")]
    InconsistentRegistry { message: String },

    /// Unclassified resolver failure, propagated with the raw message
    #[error(transparent)]
    Helper(#[from] HelperError),

    /// Workspace staging or content transform failure
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}

/// Errors staging the temporary workspace or transforming file content
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// The manifest's workspaces declaration has an unsupported shape
    #[error("unexpected workspaces declaration in {name}: {message}")]
    InvalidWorkspaces { name: String, message: String },

    /// JSON parsing error (for package.json)
    #[error("failed to parse JSON in {name}: {message}")]
    JsonParseError { name: String, message: String },

    /// No manifest exists for a lockfile's directory
    #[error("no package.json found for directory {directory}")]
    MissingManifest { directory: String },

    /// A manifest declaration could not be rewritten
    #[error("failed to update declaration for {name} in {file}: {message}")]
    DeclarationUpdate {
        file: String,
        name: String,
        message: String,
    },

    /// Generic IO error
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the resolver helper subprocess
#[derive(Error, Debug)]
pub enum HelperError {
    /// The helper process could not be started
    #[error("failed to start resolver helper '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The helper produced output that is not a valid response
    #[error("unexpected resolver helper response: {message}")]
    Protocol { message: String },

    /// The helper ran and reported a resolution failure
    #[error("resolver helper failed: {message}")]
    SubprocessFailed { message: String },
}

impl UpdateError {
    /// Creates a new NotResolvable error
    pub fn not_resolvable(message: impl Into<String>) -> Self {
        UpdateError::NotResolvable {
            message: message.into(),
        }
    }

    /// Creates a new NotEvaluatable error
    pub fn not_evaluatable(message: impl Into<String>) -> Self {
        UpdateError::NotEvaluatable {
            message: message.into(),
        }
    }

    /// Creates a new GitUnreachable error
    pub fn git_unreachable(url: impl Into<String>) -> Self {
        UpdateError::GitUnreachable { url: url.into() }
    }

    /// Creates a new PrivateAuthFailure error
    pub fn private_auth_failure(registry: impl Into<String>) -> Self {
        UpdateError::PrivateAuthFailure {
            registry: registry.into(),
        }
    }

    /// Creates a new PrivateTimeout error
    pub fn private_timeout(host: impl Into<String>) -> Self {
        UpdateError::PrivateTimeout { host: host.into() }
    }

    /// Creates a new InconsistentRegistry error
    pub fn inconsistent_registry(message: impl Into<String>) -> Self {
        UpdateError::InconsistentRegistry {
            message: message.into(),
        }
    }

    /// Returns the stable category name for this error
    pub fn category(&self) -> &'static str {
        match self {
            UpdateError::NotResolvable { .. } => "not_resolvable",
            UpdateError::NotEvaluatable { .. } => "not_evaluatable",
            UpdateError::GitUnreachable { .. } => "git_unreachable",
            UpdateError::PrivateAuthFailure { .. } => "private_auth_failure",
            UpdateError::PrivateTimeout { .. } => "private_timeout",
            UpdateError::InconsistentRegistry { .. } => "inconsistent_registry",
            UpdateError::Helper(_) => "helper_failure",
            UpdateError::Workspace(_) => "workspace_failure",
        }
    }

    /// Whether this error is a classified resolver outcome rather than an
    /// operational failure of this tool
    pub fn is_classified(&self) -> bool {
        !matches!(self, UpdateError::Helper(_) | UpdateError::Workspace(_))
    }
}

impl WorkspaceError {
    /// Creates a new InvalidWorkspaces error
    pub fn invalid_workspaces(name: impl Into<String>, message: impl Into<String>) -> Self {
        WorkspaceError::InvalidWorkspaces {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(name: impl Into<String>, message: impl Into<String>) -> Self {
        WorkspaceError::JsonParseError {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a new MissingManifest error
    pub fn missing_manifest(directory: impl Into<String>) -> Self {
        WorkspaceError::MissingManifest {
            directory: directory.into(),
        }
    }

    /// Creates a new DeclarationUpdate error
    pub fn declaration_update(
        file: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        WorkspaceError::DeclarationUpdate {
            file: file.into(),
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a new IO error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WorkspaceError::Io {
            path: path.into(),
            source,
        }
    }
}

impl HelperError {
    /// Creates a new Spawn error
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        HelperError::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Creates a new Protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        HelperError::Protocol {
            message: message.into(),
        }
    }

    /// Creates a new SubprocessFailed error
    pub fn subprocess_failed(message: impl Into<String>) -> Self {
        HelperError::SubprocessFailed {
            message: message.into(),
        }
    }

    /// Returns the raw failure message when the helper itself failed
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            HelperError::SubprocessFailed { message } => Some(message),
            _ => None,
        }
    }
}
