//! relock - Yarn lockfile update engine
//!
//! This library re-resolves yarn.lock files after dependency updates:
//! - Stages a pruned copy of the project for the resolver helper
//! - Drives the Node.js resolver helper with retries
//! - Restores SSH git sources and integrity policy in the output
//! - Classifies resolver failures into typed errors

pub mod cli;
pub mod domain;
pub mod error;
pub mod git_config;
pub mod helper;
pub mod lockfile;
pub mod manifest;
pub mod output;
pub mod progress;
pub mod registry;
pub mod stage;
pub mod transform;
pub mod updater;
