//! Orchestration state shared by the lifecycle stages.

use super::{engine::BundleHandle, paths::VirtualPaths, watch::WatchController};

/// State of the single in-flight orchestration of this process.
///
/// Created empty, threaded by `&mut` through every stage, and reset to
/// empty by cleanup. Watch mode keeps it alive across stage calls.
#[derive(Debug, Default)]
pub struct BuildState {
    pub(crate) paths: Option<VirtualPaths>,
    pub(crate) watch: WatchController,
    pub(crate) last_bundle: Option<BundleHandle>,
}

impl BuildState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths captured by the first build stage, if any.
    pub fn paths(&self) -> Option<&VirtualPaths> {
        self.paths.as_ref()
    }

    pub fn is_captured(&self) -> bool {
        self.paths.is_some()
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_watching()
    }

    pub fn watch(&self) -> &WatchController {
        &self.watch
    }

    /// Handle of the most recent single-entry build.
    pub fn last_bundle(&self) -> Option<&BundleHandle> {
        self.last_bundle.as_ref()
    }

    /// Returns the state to its initial values.
    pub fn reset(&mut self) {
        self.watch.reset();
        self.paths = None;
        self.last_bundle = None;
    }
}
