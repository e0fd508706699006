//! # rebrand-release
//!
//! A CLI tool that keeps a rebranded copy of a third-party package in step
//! with its upstream releases.
//!
//! This crate provides functionality to:
//! - Locate the upstream remote and fetch its default branch and tags
//! - Guard a dedicated release branch (it is never created automatically)
//! - Merge a newly tagged upstream release, preferring upstream on conflict
//! - Regenerate the package under its new name, rewriting imports
//! - Rewrite the packaging descriptor and commit the result
//! - Reset to the starting commit if anything fails after the merge
//!
//! ## Usage
//!
//! ```bash
//! # Merge the latest upstream release and regenerate the package
//! rebrand-release
//!
//! # Only regenerate the package from the current release branch
//! rebrand-release --skip-release-merge
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface and main entry point
//! - [`workflow`] - Step ordering and rollback
//! - [`git`] - Version-control collaborator
//! - [`remote`], [`branch`], [`tags`], [`sync`] - Repository steps
//! - [`rewrite`] - Namespace rewriting of the package tree
//! - [`metadata`] - Packaging descriptor rewriting
//! - [`config`] - `rebrand.toml` loading
//! - [`prompt`] - Confirmation abstractions
//! - [`banner`] - Success summary

pub mod banner;
pub mod branch;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod metadata;
pub mod prompt;
pub mod remote;
pub mod rewrite;
pub mod sync;
pub mod tags;
#[cfg(test)]
mod test_support;
pub mod workflow;
