//! Pipeline lifecycle events and the stages they run.
//!
//! Hosts either call the stage functions on [`Stages`] directly or translate
//! their hook names with [`LifecycleEvent`] and call [`Stages::dispatch`].

use super::{
    BuildOrchestrator, BuildState, Error, Result,
    artifacts::RelocationReport,
    cleanup,
    engine::{BundlerFactory, PipelineHost},
    entries, paths,
    watch::resolve_module_path,
};
use crate::service::Service;
use std::{fmt, str::FromStr, sync::Arc};

/// Host lifecycle events this layer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    BeforeRun,
    BeforeOfflineStart,
    BeforeOfflineStartInit,
    BeforePackageCreateArtifacts,
    AfterPackageCreateArtifacts,
    BeforeDeployFunctionPackage,
    AfterDeployFunctionPackage,
    BeforeInvokeLocal,
    AfterInvokeLocal,
}

/// Work performed for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Virtualize the service path and bundle.
    Build,
    /// Relocate artifacts, restore the service path, remove the build folder.
    Cleanup,
    /// Build, then invalidate the cached module of the last bundle.
    PrepareInvoke,
    /// Report that watch mode is waiting for changes.
    FinishInvoke,
}

impl LifecycleEvent {
    pub const ALL: [Self; 9] = [
        Self::BeforeRun,
        Self::BeforeOfflineStart,
        Self::BeforeOfflineStartInit,
        Self::BeforePackageCreateArtifacts,
        Self::AfterPackageCreateArtifacts,
        Self::BeforeDeployFunctionPackage,
        Self::AfterDeployFunctionPackage,
        Self::BeforeInvokeLocal,
        Self::AfterInvokeLocal,
    ];

    /// The host's hook name for this event.
    pub fn hook_name(self) -> &'static str {
        match self {
            Self::BeforeRun => "before:run:run",
            Self::BeforeOfflineStart => "before:offline:start",
            Self::BeforeOfflineStartInit => "before:offline:start:init",
            Self::BeforePackageCreateArtifacts => "before:package:createDeploymentArtifacts",
            Self::AfterPackageCreateArtifacts => "after:package:createDeploymentArtifacts",
            Self::BeforeDeployFunctionPackage => "before:deploy:function:packageFunction",
            Self::AfterDeployFunctionPackage => "after:deploy:function:packageFunction",
            Self::BeforeInvokeLocal => "before:invoke:local:invoke",
            Self::AfterInvokeLocal => "after:invoke:local:invoke",
        }
    }

    pub fn stage(self) -> Stage {
        match self {
            Self::BeforeRun
            | Self::BeforeOfflineStart
            | Self::BeforeOfflineStartInit
            | Self::BeforePackageCreateArtifacts
            | Self::BeforeDeployFunctionPackage => Stage::Build,
            Self::AfterPackageCreateArtifacts | Self::AfterDeployFunctionPackage => Stage::Cleanup,
            Self::BeforeInvokeLocal => Stage::PrepareInvoke,
            Self::AfterInvokeLocal => Stage::FinishInvoke,
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hook_name())
    }
}

impl FromStr for LifecycleEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|event| event.hook_name() == s)
            .ok_or_else(|| Error::GenericError(format!("unknown lifecycle event `{s}`")))
    }
}

/// Per-invocation options supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Restrict the build to one function.
    pub function: Option<String>,

    /// Keep the bundler watching. Only honored for a single entry.
    pub watch: bool,
}

/// Stage functions bound to a collaborator, a host, and run options.
pub struct Stages {
    orchestrator: BuildOrchestrator,
    host: Arc<dyn PipelineHost>,
    options: RunOptions,
}

impl fmt::Debug for Stages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stages")
            .field("orchestrator", &self.orchestrator)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Stages {
    pub fn new(
        factory: Arc<dyn BundlerFactory>,
        host: Arc<dyn PipelineHost>,
        options: RunOptions,
    ) -> Self {
        Self {
            orchestrator: BuildOrchestrator::new(factory, Arc::clone(&host)),
            host,
            options,
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Runs the stage mapped to `event`.
    ///
    /// Only cleanup produces a report.
    pub async fn dispatch(
        &self,
        event: LifecycleEvent,
        state: &mut BuildState,
        service: &mut Service,
    ) -> Result<Option<RelocationReport>> {
        log::debug!("Handling {event}");
        match event.stage() {
            Stage::Build => self.build(state, service).await.map(|()| None),
            Stage::Cleanup => self.cleanup(state, service).await,
            Stage::PrepareInvoke => self.prepare_invoke(state, service).await.map(|()| None),
            Stage::FinishInvoke => {
                self.finish_invoke(state);
                Ok(None)
            }
        }
    }

    /// Virtualizes the service path on first use, then bundles the
    /// functions in scope.
    pub async fn build(&self, state: &mut BuildState, service: &mut Service) -> Result<()> {
        log::info!("Compiling with {}...", self.orchestrator.bundler_name());

        let settings = service.bundle_settings();
        if !state.is_captured() {
            state.paths = Some(paths::capture(
                &mut service.service_path,
                settings.build_folder(),
            )?);
        }

        let functions = entries::select_functions(service, self.options.function.as_deref())?;
        let entries = entries::resolve_entries(functions);

        self.orchestrator
            .run(state, entries, &settings, self.options.watch)
            .await
    }

    /// Relocates artifacts and restores the service path.
    pub async fn cleanup(
        &self,
        state: &mut BuildState,
        service: &mut Service,
    ) -> Result<Option<RelocationReport>> {
        cleanup::cleanup(state, service, self.options.function.as_deref()).await
    }

    /// Builds, then drops the host's cached copy of the last bundle so the
    /// invocation loads fresh code.
    pub async fn prepare_invoke(&self, state: &mut BuildState, service: &mut Service) -> Result<()> {
        self.build(state, service).await?;

        if let (Some(handle), Some(paths)) = (state.last_bundle(), state.paths()) {
            self.host
                .invalidate_module(&resolve_module_path(&handle.module_path, paths.original()));
        }
        Ok(())
    }

    /// Logs the watch notice after a local invocation.
    pub fn finish_invoke(&self, state: &BuildState) {
        if state.is_watching() {
            log::info!("Waiting for changes ...");
        }
    }
}
