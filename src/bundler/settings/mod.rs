//! Configuration structures for bundling operations.
//!
//! [`BundleSettings`] mirrors the `[custom.bundle]` table of the service
//! definition. [`BundleOptions`] is what a collaborator receives for one
//! entry: defaults merged with the user's settings, the requested watch
//! flag, and the computed output directory.

mod core;
mod options;

pub use core::{BundleSettings, DEFAULT_BUILD_FOLDER, DEFAULT_COMMAND, DEFAULT_TARGET};
pub use options::BundleOptions;
