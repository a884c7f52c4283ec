//! External bundler program detection.

use crate::bundler::{Error, Result};
use std::path::PathBuf;

/// Locates `command` on PATH.
///
/// Paths containing a separator are taken as-is when they exist.
pub fn locate_tool(command: &str) -> Result<PathBuf> {
    match which::which(command) {
        Ok(path) => {
            log::debug!("Found {} at: {}", command, path.display());
            Ok(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", command, e);
            Err(Error::ToolNotFound(command.to_string()))
        }
    }
}
