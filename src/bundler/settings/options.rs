//! Per-entry bundling options handed to the collaborator.

use super::{BundleSettings, DEFAULT_TARGET};
use serde::Serialize;
use serde_json::Value;
use std::{collections::BTreeMap, path::PathBuf};

/// Pass-through keys the orchestrator computes itself.
const RESERVED_KEYS: &[&str] = &["watch", "out_dir", "outDir"];

/// Options for a single collaborator invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleOptions {
    pub target: String,
    pub cache: bool,
    pub watch: bool,

    /// Output directory relative to the original service path.
    pub out_dir: PathBuf,

    /// User options forwarded verbatim.
    pub extra: BTreeMap<String, Value>,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            cache: false,
            watch: false,
            out_dir: PathBuf::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl BundleOptions {
    /// Merges the defaults with user settings. User values win.
    ///
    /// `watch` comes from the run-time option, never from configuration, so a
    /// `watch` key in the pass-through table is dropped with a warning. The
    /// same applies to output directory keys.
    pub fn merged(settings: &BundleSettings, watch: bool) -> Self {
        let mut extra = settings.extra.clone();
        for key in RESERVED_KEYS {
            if extra.remove(*key).is_some() {
                log::warn!("Ignoring bundle option `{key}`: it is computed per build");
            }
        }

        Self {
            target: settings.target().to_string(),
            cache: settings.cache(),
            watch,
            out_dir: PathBuf::new(),
            extra,
        }
    }

    /// Returns a copy with a different output directory.
    pub fn with_out_dir(&self, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with watch mode forced to `watch`.
    pub fn with_watch(&self, watch: bool) -> Self {
        Self {
            watch,
            ..self.clone()
        }
    }
}
