//! Post-packaging cleanup.

use super::{
    BuildState, Result,
    artifacts::{self, RelocationReport},
    paths, utils::fs,
};
use crate::service::Service;
use std::path::PathBuf;

/// Relocates artifacts, restores the service path, and removes the build
/// folder, then resets `state`.
///
/// Returns `Ok(None)` when no build cycle captured the service path.
///
/// # Errors
///
/// Relocation failures are returned before the service path is restored, so
/// the host must treat them as a hard stop. Failing to remove the build
/// folder is only logged.
pub async fn cleanup(
    state: &mut BuildState,
    service: &mut Service,
    target: Option<&str>,
) -> Result<Option<RelocationReport>> {
    cleanup_with(state, service, target, |build_path| async move {
        fs::remove_dir_all(&build_path).await
    })
    .await
}

/// [`cleanup`] with a caller-supplied removal of the build folder.
pub async fn cleanup_with<F, Fut>(
    state: &mut BuildState,
    service: &mut Service,
    target: Option<&str>,
    remove_build_dir: F,
) -> Result<Option<RelocationReport>>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let Some(paths) = state.paths().cloned() else {
        log::debug!("No build cycle captured the service path, nothing to clean up");
        return Ok(None);
    };

    let report = artifacts::relocate(&paths, service, target).await?;

    paths::restore(&mut service.service_path, Some(&paths));

    if let Err(e) = remove_build_dir(paths.build_path().to_path_buf()).await {
        log::warn!(
            "Failed to remove build folder {}: {e}",
            paths.build_path().display()
        );
    }

    state.reset();
    Ok(Some(report))
}
