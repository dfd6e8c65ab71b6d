//! yarn.lock reading and surgery
//!
//! This module provides:
//! - A minimal yarn.lock v1 entry reader used for classification lookups
//! - Removal of a dependency's entry blocks so the resolver re-resolves it

mod parser;

pub use parser::{parse, remove_dependency_blocks, specifier_name, LockfileEntry};
