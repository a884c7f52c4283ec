//! Recording doubles for the bundler and host seams.

#![allow(dead_code)]

use anyhow::bail;
use async_trait::async_trait;
use kodegen_bundler_serverless::bundler::{
    BundleHandle, BundleOptions, BundlerFactory, EntryBundler, PipelineHost, RebuildEvent,
    RebuildReceiver, RebuildSender,
};
use kodegen_bundler_serverless::service::{FunctionDescriptor, Service};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, mpsc};

#[derive(Debug, Clone, PartialEq)]
pub struct BundleCall {
    pub entry: String,
    pub options: BundleOptions,
}

#[derive(Debug, Default)]
pub struct MockFactory {
    calls: Arc<Mutex<Vec<BundleCall>>>,
    fail_on: Option<String>,
    rebuild_tx: Arc<Mutex<Option<RebuildSender>>>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(entry: &str) -> Self {
        Self {
            fail_on: Some(entry.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<BundleCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn entries(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.entry).collect()
    }

    /// Simulates the collaborator finishing a rebuild.
    pub fn trigger_rebuild(&self, entry: &str) -> bool {
        match self.rebuild_tx.lock().unwrap().as_ref() {
            Some(tx) => tx.send(RebuildEvent::now(entry)).is_ok(),
            None => false,
        }
    }
}

impl BundlerFactory for MockFactory {
    fn name(&self) -> &str {
        "mock"
    }

    fn create(&self, entry: &str, options: &BundleOptions) -> Box<dyn EntryBundler> {
        Box::new(MockBundler {
            call: BundleCall {
                entry: entry.to_string(),
                options: options.clone(),
            },
            calls: Arc::clone(&self.calls),
            fail: self.fail_on.as_deref() == Some(entry),
            rebuild_tx: Arc::clone(&self.rebuild_tx),
            rebuilds: None,
        })
    }
}

struct MockBundler {
    call: BundleCall,
    calls: Arc<Mutex<Vec<BundleCall>>>,
    fail: bool,
    rebuild_tx: Arc<Mutex<Option<RebuildSender>>>,
    rebuilds: Option<RebuildReceiver>,
}

#[async_trait]
impl EntryBundler for MockBundler {
    async fn bundle(&mut self) -> anyhow::Result<BundleHandle> {
        self.calls.lock().unwrap().push(self.call.clone());
        if self.fail {
            bail!("syntax error in {}", self.call.entry);
        }

        if self.call.options.watch {
            let (tx, rx) = mpsc::unbounded_channel();
            *self.rebuild_tx.lock().unwrap() = Some(tx);
            self.rebuilds = Some(rx);
        }

        Ok(BundleHandle::new(
            self.call.entry.clone(),
            self.call.options.out_dir.join("handler.js"),
        ))
    }

    fn rebuilds(&mut self) -> Option<RebuildReceiver> {
        self.rebuilds.take()
    }
}

#[derive(Debug, Default)]
pub struct MockHost {
    invocations: AtomicUsize,
    invalidated: Mutex<Vec<PathBuf>>,
    pub invoked: Notify,
    fail_invocations: bool,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_invocations: true,
            ..Self::default()
        }
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    pub fn invalidated(&self) -> Vec<PathBuf> {
        self.invalidated.lock().unwrap().clone()
    }
}

#[async_trait]
impl PipelineHost for MockHost {
    async fn invoke_local(&self) -> anyhow::Result<()> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.invoked.notify_one();
        if self.fail_invocations {
            bail!("handler threw");
        }
        Ok(())
    }

    fn invalidate_module(&self, resolved_path: &Path) {
        self.invalidated
            .lock()
            .unwrap()
            .push(resolved_path.to_path_buf());
    }
}

/// Service with one function per `(name, handler)` pair.
pub fn service(root: impl Into<PathBuf>, functions: &[(&str, &str)]) -> Service {
    functions
        .iter()
        .fold(Service::new(root), |service, (name, handler)| {
            service.with_function(FunctionDescriptor::new(*name, *handler))
        })
}

/// Writes `contents` at `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}
