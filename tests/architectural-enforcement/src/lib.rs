//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce the boundaries of
//! the reconciliation engine:
//! - No sleep() calls in engine code
//! - No direct stdout/stderr output (logging goes through `tracing`)
//! - No unwrap()/expect() outside test modules
//! - No UI framework or network client dependencies in the core crate
//!
//! These tests are designed to catch violations early in the development cycle.

#![allow(dead_code)]

use std::path::PathBuf;

/// Workspace root, resolved from this package's manifest directory
#[must_use]
pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}
