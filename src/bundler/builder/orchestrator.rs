//! Main build orchestration.
//!
//! This module provides the [`BuildOrchestrator`] that drives the bundling
//! collaborator for the entries resolved from the service's functions.

use std::sync::Arc;

use crate::bundler::{
    BuildState, BundleOptions, BundleSettings, Error, Result,
    engine::{BundleHandle, BundlerFactory, PipelineHost},
    error::Context,
    paths::VirtualPaths,
};

use super::plan::BuildPlan;

/// Drives the collaborator for one build pass.
///
/// # Strategy
///
/// - **One entry**: a single build that may watch. Its handle is kept in
///   [`BuildState`] for cache invalidation, and in watch mode its rebuilds
///   are forwarded to the host.
/// - **Several entries**: sequential builds in entry order, never watching.
///   The first failure aborts the remaining entries.
/// - **No entries**: nothing happens.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use kodegen_bundler_serverless::bundler::{
///     BuildOrchestrator, BuildState, BundleSettings, CommandBundlerFactory, PipelineHost,
/// };
///
/// # async fn example(host: Arc<dyn PipelineHost>, state: &mut BuildState)
/// #     -> kodegen_bundler_serverless::bundler::Result<()> {
/// let factory = Arc::new(CommandBundlerFactory::locate("parcel", "/svc")?);
/// let orchestrator = BuildOrchestrator::new(factory, host);
///
/// orchestrator
///     .run(state, vec!["src/handler.[jt]s".into()], &BundleSettings::default(), false)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct BuildOrchestrator {
    factory: Arc<dyn BundlerFactory>,
    host: Arc<dyn PipelineHost>,
}

impl std::fmt::Debug for BuildOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildOrchestrator")
            .field("factory", &self.factory.name())
            .finish_non_exhaustive()
    }
}

impl BuildOrchestrator {
    pub fn new(factory: Arc<dyn BundlerFactory>, host: Arc<dyn PipelineHost>) -> Self {
        Self { factory, host }
    }

    /// Name of the underlying collaborator.
    pub fn bundler_name(&self) -> &str {
        self.factory.name()
    }

    /// Bundles `entries`.
    ///
    /// Returns immediately while a watching build is active. The service path
    /// must already be captured in `state`.
    ///
    /// # Errors
    ///
    /// [`Error::Bundle`] for the first collaborator failure. Nothing is retried.
    pub async fn run(
        &self,
        state: &mut BuildState,
        entries: Vec<String>,
        settings: &BundleSettings,
        watch: bool,
    ) -> Result<()> {
        if state.is_watching() {
            log::debug!("Watch mode already active, skipping build");
            return Ok(());
        }

        let paths = state
            .paths()
            .cloned()
            .context("service path must be captured before bundling")?;
        let options = BundleOptions::merged(settings, watch);
        let plan = BuildPlan::from_entries(entries);

        match &plan {
            BuildPlan::Empty => {
                log::debug!("No entries resolved, nothing to bundle");
            }
            BuildPlan::SingleWatchable(entry) => {
                let options = options.with_watch(plan.watches(watch));
                let (handle, rebuilds) = self.bundle_entry(entry, &paths, &options).await?;

                if options.watch {
                    state
                        .watch
                        .attach(rebuilds, &handle, paths.original(), Arc::clone(&self.host));
                }
                state.last_bundle = Some(handle);
            }
            BuildPlan::MultiSequential(entries) => {
                if watch {
                    log::warn!(
                        "Watch mode requires exactly one function; building {} entries once",
                        entries.len()
                    );
                }
                let options = options.with_watch(false);
                for entry in entries {
                    self.bundle_entry(entry, &paths, &options).await?;
                }
            }
        }

        Ok(())
    }

    async fn bundle_entry(
        &self,
        entry: &str,
        paths: &VirtualPaths,
        options: &BundleOptions,
    ) -> Result<(BundleHandle, Option<crate::bundler::engine::RebuildReceiver>)> {
        let options = options.with_out_dir(paths.entry_out_dir(entry)?);
        log::debug!("Bundling {} into {}", entry, options.out_dir.display());

        let mut bundler = self.factory.create(entry, &options);
        let handle = bundler.bundle().await.map_err(|source| Error::Bundle {
            entry: entry.to_string(),
            source,
        })?;

        let rebuilds = if options.watch { bundler.rebuilds() } else { None };
        Ok((handle, rebuilds))
    }
}
