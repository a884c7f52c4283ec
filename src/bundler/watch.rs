//! Watch-mode state and rebuild re-invocation.
//!
//! Rebuilds are driven by the collaborator's own watch loop. This controller
//! only records that watching is active, so repeated build stages become
//! no-ops, and forwards every rebuild completion to the host.

use super::engine::{BundleHandle, PipelineHost, RebuildReceiver};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::task::JoinHandle;

/// Tracks whether a watching build is active for this process.
#[derive(Debug, Default)]
pub struct WatchController {
    watching: bool,
    listener: Option<JoinHandle<()>>,
    rebuilds: Arc<AtomicUsize>,
}

impl WatchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a watching single-entry build is active.
    pub fn is_watching(&self) -> bool {
        self.watching
    }

    /// Rebuild completions handled since the listener was attached.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds.load(Ordering::SeqCst)
    }

    /// Marks the watching build as active and forwards its rebuilds.
    ///
    /// For every rebuild the host's module cache entry for the bundle is
    /// invalidated, then the host's local invocation is triggered. Failed
    /// invocations are logged and the loop keeps running until the
    /// collaborator closes the channel.
    pub fn attach(
        &mut self,
        rebuilds: Option<RebuildReceiver>,
        handle: &BundleHandle,
        original: &Path,
        host: Arc<dyn PipelineHost>,
    ) {
        self.watching = true;

        let Some(mut rx) = rebuilds else {
            log::warn!(
                "Bundler for {} offers no rebuild notifications; changes will not re-invoke",
                handle.entry
            );
            return;
        };

        let module = resolve_module_path(&handle.module_path, original);
        let counter = Arc::clone(&self.rebuilds);

        if let Some(previous) = self.listener.take() {
            previous.abort();
        }
        self.listener = Some(tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                counter.fetch_add(1, Ordering::SeqCst);
                log::debug!("Rebuild of {} finished, re-invoking", event.entry);

                host.invalidate_module(&module);
                if let Err(e) = host.invoke_local().await {
                    log::error!("Local invocation after rebuild failed: {e:#}");
                }
            }
            log::debug!("Rebuild notifications closed for {}", module.display());
        }));
    }

    /// Stops listening and clears the watching flag.
    pub fn reset(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
        self.watching = false;
        self.rebuilds = Arc::new(AtomicUsize::new(0));
    }
}

/// Absolute, normalized module path used as the host's cache key.
pub fn resolve_module_path(module_path: &Path, original: &Path) -> PathBuf {
    match module_path.absolutize_from(original) {
        Ok(path) => path.into_owned(),
        Err(_) => original.join(module_path),
    }
}
