//! Purpose: Shared library crate behind the `fixeol` and `renametree` binaries.
//! Exports: `core` (traversal, content transforms, reports, errors) and `cli` (shared CLI plumbing).
//! Role: Keeps both binaries thin; all filesystem behavior lives here and is unit-tested.
//! Invariants: Core runs report per-entry failures through callbacks instead of aborting.
pub mod cli;
pub mod core;
