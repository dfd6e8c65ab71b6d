//! Core domain models for relock
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency and requirement structures describing update targets
//! - Dependency file records carrying manifest and lockfile content
//! - Credentials for registries and git hosts

mod credential;
mod dependency;
mod dependency_file;

pub use credential::Credential;
pub use dependency::{Dependency, Requirement, RequirementSource};
pub use dependency_file::DependencyFile;
