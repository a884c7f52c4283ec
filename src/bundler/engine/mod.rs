//! Seams to the bundling collaborator and the host pipeline.
//!
//! The orchestrator never compiles anything itself. It drives a
//! [`BundlerFactory`] that produces one [`EntryBundler`] per entry, and it
//! calls back into the [`PipelineHost`] when watch-mode rebuilds finish.

mod command;

pub use command::{CommandBundler, CommandBundlerFactory};

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::sync::mpsc;

use super::BundleOptions;

/// Result of a successful bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleHandle {
    /// Entry the bundle was built from.
    pub entry: String,

    /// Path of the emitted module, relative to the original service path
    /// unless the collaborator reports an absolute one.
    pub module_path: PathBuf,
}

impl BundleHandle {
    pub fn new(entry: impl Into<String>, module_path: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            module_path: module_path.into(),
        }
    }
}

/// Notification sent by a watching collaborator after each rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildEvent {
    pub entry: String,
    pub finished_at: SystemTime,
}

impl RebuildEvent {
    pub fn now(entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            finished_at: SystemTime::now(),
        }
    }
}

pub type RebuildSender = mpsc::UnboundedSender<RebuildEvent>;
pub type RebuildReceiver = mpsc::UnboundedReceiver<RebuildEvent>;

/// A collaborator bound to a single entry and its options.
#[async_trait]
pub trait EntryBundler: Send {
    /// Builds the entry once. In watch mode the collaborator keeps watching
    /// after this returns.
    async fn bundle(&mut self) -> Result<BundleHandle>;

    /// Subscription to rebuild completions. Only meaningful in watch mode.
    fn rebuilds(&mut self) -> Option<RebuildReceiver> {
        None
    }
}

/// Constructs collaborators per entry.
pub trait BundlerFactory: Send + Sync {
    /// Short name used in progress logs.
    fn name(&self) -> &str;

    fn create(&self, entry: &str, options: &BundleOptions) -> Box<dyn EntryBundler>;
}

/// Callbacks into the host pipeline.
#[async_trait]
pub trait PipelineHost: Send + Sync {
    /// Runs the host's local invocation of the function under watch.
    async fn invoke_local(&self) -> Result<()>;

    /// Drops any cached module loaded from `resolved_path` so the next
    /// invocation loads fresh code.
    fn invalidate_module(&self, resolved_path: &Path);
}
