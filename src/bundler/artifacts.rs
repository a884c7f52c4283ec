//! Relocation of packaged artifacts out of the build folder.
//!
//! The host packages while its service path points at the build folder, so
//! its output lands in `<build>/.serverless` and every artifact reference
//! points there. Relocation copies that output to `<original>/.serverless`
//! and rewrites the references the host will deploy from.

use super::{Error, Result, builder::checksum::calculate_sha256, paths::VirtualPaths, utils::fs};
use crate::service::Service;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Which artifact field was rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ArtifactOwner {
    /// A function's own artifact.
    Function(String),

    /// The service-wide artifact.
    Service,
}

/// One rewritten artifact reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelocatedArtifact {
    pub owner: ArtifactOwner,

    /// Reference before the rewrite.
    pub from: PathBuf,

    /// Reference after the rewrite.
    pub to: PathBuf,

    /// Size in bytes, when the relocated file exists.
    pub size: Option<u64>,

    /// SHA256 of the relocated file, when it exists.
    pub checksum: Option<String>,
}

/// Outcome of a relocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelocationReport {
    /// Directory the packaged output was copied to.
    pub output_dir: PathBuf,

    /// Rewritten references, in rewrite order.
    pub artifacts: Vec<RelocatedArtifact>,
}

/// Copies packaged output back and rewrites artifact references.
///
/// Exactly one rewrite branch runs, by precedence:
/// 1. `target` is set: only that function's artifact.
/// 2. The service packages individually: every function's artifact, in
///    declaration order.
/// 3. Otherwise: the service-wide artifact.
///
/// Unset artifact fields are left alone.
///
/// # Errors
///
/// [`Error::Relocation`] when the packaged output is missing or the copy
/// fails. References are not rewritten in that case.
pub async fn relocate(
    paths: &VirtualPaths,
    service: &mut Service,
    target: Option<&str>,
) -> Result<RelocationReport> {
    let from = paths.packaged_output();
    let to = paths.relocated_output();

    log::debug!("Relocating {} -> {}", from.display(), to.display());
    fs::copy_dir(&from, &to)
        .await
        .map_err(|source| Error::Relocation {
            from: from.clone(),
            to: to.clone(),
            source: Box::new(source),
        })?;

    let mut rewrites = Vec::new();
    if let Some(name) = target {
        match service.function_mut(name) {
            Some(function) => {
                if let Some(artifact) = function.package.artifact.as_mut() {
                    let previous = rewrite(artifact, &to);
                    rewrites.push((ArtifactOwner::Function(name.to_string()), previous));
                }
            }
            None => log::warn!("Function {name} is not defined; no artifact rewritten"),
        }
    } else if service.package.is_individually() {
        for function in &mut service.functions {
            if let Some(artifact) = function.package.artifact.as_mut() {
                let previous = rewrite(artifact, &to);
                rewrites.push((ArtifactOwner::Function(function.name.clone()), previous));
            }
        }
    } else if let Some(artifact) = service.package.artifact.as_mut() {
        let previous = rewrite(artifact, &to);
        rewrites.push((ArtifactOwner::Service, previous));
    }

    let mut artifacts = Vec::with_capacity(rewrites.len());
    for (owner, previous) in rewrites {
        let current = relocated_path(&previous, &to);
        artifacts.push(describe(owner, previous, current).await?);
    }

    Ok(RelocationReport {
        output_dir: to,
        artifacts,
    })
}

/// `<output_dir>/<file name of artifact>`
pub fn relocated_path(artifact: &Path, output_dir: &Path) -> PathBuf {
    match artifact.file_name() {
        Some(name) => output_dir.join(name),
        None => output_dir.to_path_buf(),
    }
}

/// Rewrites `artifact` in place, returning its previous value.
fn rewrite(artifact: &mut PathBuf, output_dir: &Path) -> PathBuf {
    let relocated = relocated_path(artifact, output_dir);
    std::mem::replace(artifact, relocated)
}

async fn describe(owner: ArtifactOwner, from: PathBuf, to: PathBuf) -> Result<RelocatedArtifact> {
    let (size, checksum) = match tokio::fs::metadata(&to).await {
        Ok(meta) if meta.is_file() => (Some(meta.len()), Some(calculate_sha256(&to).await?)),
        _ => (None, None),
    };

    log::info!("Artifact {} -> {}", from.display(), to.display());
    Ok(RelocatedArtifact {
        owner,
        from,
        to,
        size,
        checksum,
    })
}
