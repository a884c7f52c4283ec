//! Service path virtualization.
//!
//! While a build cycle is active the host's service path points at the
//! build folder, so the host packages compiled output instead of sources.

use super::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Host packaging output folder name.
pub const SERVERLESS_FOLDER: &str = ".serverless";

/// Paths captured at the start of an orchestration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualPaths {
    original: PathBuf,
    build_folder: String,
    build_path: PathBuf,
}

impl VirtualPaths {
    /// Computes the build path for `original`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBuildFolder`] when the folder is empty, absolute, or
    /// climbs out of the service directory.
    pub fn new(original: impl Into<PathBuf>, build_folder: &str) -> Result<Self> {
        let folder = Path::new(build_folder);
        let escapes = folder
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        let has_normal = folder.components().any(|c| matches!(c, Component::Normal(_)));
        if build_folder.is_empty() || escapes || !has_normal {
            return Err(Error::InvalidBuildFolder(build_folder.to_string()));
        }

        let original = original.into();
        let build_path = original.join(folder);
        Ok(Self {
            original,
            build_folder: build_folder.to_string(),
            build_path,
        })
    }

    /// The service path before virtualization.
    pub fn original(&self) -> &Path {
        &self.original
    }

    pub fn build_folder(&self) -> &str {
        &self.build_folder
    }

    /// `<original>/<build_folder>`
    pub fn build_path(&self) -> &Path {
        &self.build_path
    }

    /// Packaging output produced inside the build path.
    pub fn packaged_output(&self) -> PathBuf {
        self.build_path.join(SERVERLESS_FOLDER)
    }

    /// Packaging output location the host expects.
    pub fn relocated_output(&self) -> PathBuf {
        self.original.join(SERVERLESS_FOLDER)
    }

    /// Output directory for an entry, relative to the original service path.
    ///
    /// `src/handler.[jt]s` with build folder `.build` yields `.build/src`.
    ///
    /// # Errors
    ///
    /// [`Error::EntryOutsideService`] when the entry's directory is absolute
    /// or climbs above the service directory, since its output would land
    /// outside the build folder.
    pub fn entry_out_dir(&self, entry: &str) -> Result<PathBuf> {
        let outside = || Error::EntryOutsideService(entry.to_string());
        let mut dirs = Vec::new();
        if let Some(parent) = Path::new(entry).parent() {
            for component in parent.components() {
                match component {
                    Component::Normal(part) => dirs.push(part),
                    Component::ParentDir => {
                        dirs.pop().ok_or_else(outside)?;
                    }
                    Component::CurDir => {}
                    Component::RootDir | Component::Prefix(_) => return Err(outside()),
                }
            }
        }

        let mut out_dir = PathBuf::from(&self.build_folder);
        out_dir.extend(dirs);
        Ok(out_dir)
    }
}

/// Points the live service path at the build folder.
///
/// Returns the captured paths. Callers run this once per orchestration.
pub fn capture(service_path: &mut PathBuf, build_folder: &str) -> Result<VirtualPaths> {
    let paths = VirtualPaths::new(service_path.clone(), build_folder)?;
    log::debug!(
        "Virtualizing service path {} -> {}",
        paths.original().display(),
        paths.build_path().display()
    );
    *service_path = paths.build_path().to_path_buf();
    Ok(paths)
}

/// Writes the original service path back. No-op when nothing was captured.
pub fn restore(service_path: &mut PathBuf, paths: Option<&VirtualPaths>) {
    if let Some(paths) = paths {
        *service_path = paths.original().to_path_buf();
    }
}
