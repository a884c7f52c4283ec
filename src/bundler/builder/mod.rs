//! Build orchestration and coordination.
//!
//! This module provides the [`BuildOrchestrator`] that turns resolved entries
//! into collaborator invocations.
//!
//! # Overview
//!
//! The orchestrator:
//! 1. Skips the pass entirely while a watching build is active
//! 2. Merges default options with the user's [`BundleSettings`]
//! 3. Chooses a [`BuildPlan`] from the entry count
//! 4. Runs the collaborator once per entry, in order
//! 5. Retains the single-entry handle and hooks up watch-mode rebuilds
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for relocated artifacts
//! - [`orchestrator`] - [`BuildOrchestrator`] and the build pass
//! - [`plan`] - [`BuildPlan`] selection
//! - [`tool_detection`] - External bundler program lookup
//!
//! [`BundleSettings`]: crate::bundler::BundleSettings

pub mod checksum;
mod orchestrator;
mod plan;
pub mod tool_detection;

pub use orchestrator::BuildOrchestrator;
pub use plan::BuildPlan;
