//! Bundle orchestration for serverless packaging.
//!
//! The bundler layer sits between a deployment pipeline and a code bundler:
//!
//! 1. [`paths`] points the host's service path at a temporary build folder
//! 2. [`entries`] derives bundler entries from function handlers
//! 3. [`builder`] drives the bundling collaborator (see [`engine`])
//! 4. [`watch`] forwards watch-mode rebuilds back to the host
//! 5. [`artifacts`] copies packaged output back after the host packages
//! 6. [`cleanup`] restores the service path and removes the build folder
//!
//! [`lifecycle`] ties these together as stage functions keyed by the host's
//! lifecycle events, with all mutable orchestration data held in a
//! [`BuildState`].

pub mod artifacts;
pub mod builder;
pub mod cleanup;
pub mod engine;
pub mod entries;
pub mod error;
pub mod lifecycle;
pub mod paths;
pub mod settings;
pub mod state;
pub mod utils;
pub mod watch;

pub use artifacts::{ArtifactOwner, RelocatedArtifact, RelocationReport};
pub use builder::{BuildOrchestrator, BuildPlan};
pub use engine::{
    BundleHandle, BundlerFactory, CommandBundler, CommandBundlerFactory, EntryBundler,
    PipelineHost, RebuildEvent, RebuildReceiver, RebuildSender,
};
pub use error::{Error, Result};
pub use lifecycle::{LifecycleEvent, RunOptions, Stage, Stages};
pub use paths::VirtualPaths;
pub use settings::{BundleOptions, BundleSettings};
pub use state::BuildState;
pub use watch::WatchController;
