//! Registry and git host credentials

use serde::{Deserialize, Serialize};

/// A credential made available to the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credential {
    /// Token for an npm registry, e.g. "npm.fury.io/acme"
    NpmRegistry {
        registry: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        token: Option<String>,
        /// Whether this registry replaces the public default registry
        #[serde(default)]
        replaces_base: bool,
    },
    /// Username and password for a git host, e.g. "github.com"
    GitSource {
        host: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        password: Option<String>,
    },
}

impl Credential {
    /// Creates a new npm registry credential
    pub fn npm_registry(registry: impl Into<String>, token: Option<String>) -> Self {
        Credential::NpmRegistry {
            registry: registry.into(),
            token,
            replaces_base: false,
        }
    }

    /// Creates a new git host credential
    pub fn git_source(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Credential::GitSource {
            host: host.into(),
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Marks an npm registry credential as replacing the default registry
    /// (builder pattern, no-op for git credentials)
    pub fn replacing_base(mut self) -> Self {
        if let Credential::NpmRegistry { replaces_base, .. } = &mut self {
            *replaces_base = true;
        }
        self
    }

    /// Returns the registry for npm credentials
    pub fn registry(&self) -> Option<&str> {
        match self {
            Credential::NpmRegistry { registry, .. } => Some(registry),
            Credential::GitSource { .. } => None,
        }
    }
}
