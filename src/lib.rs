//! Bundler orchestration for serverless function packaging.
//!
//! This library sits between a deployment pipeline and a code bundler:
//! - Compiles function handlers into a temporary build folder
//! - Points the pipeline's service path at that folder while it packages
//! - Copies the packaged output back and rewrites artifact references
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;
pub mod service;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
