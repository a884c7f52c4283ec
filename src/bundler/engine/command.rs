//! Collaborator that shells out to an external bundler program.
//!
//! The program is invoked as
//! `<program> build <entry> --out-dir <dir> --target <target> [--no-cache] [--<key> <value>]...`
//! from the original service directory. In watch mode the entry's source
//! directory is watched and the build re-run after each debounced change.

use super::{BundleHandle, BundlerFactory, EntryBundler, RebuildEvent, RebuildReceiver, RebuildSender};
use crate::bundler::{
    BundleOptions, Result as BundlerResult, builder::tool_detection::locate_tool,
    entries::SOURCE_EXTENSION_PATTERN,
};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use notify::RecursiveMode;
use notify_debouncer_mini::{DebouncedEventKind, new_debouncer};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{RecvTimeoutError, channel};
use std::time::Duration;
use tokio::sync::mpsc;

/// Quiet period before a burst of file changes triggers a rebuild.
const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);

/// How often an idle watcher checks whether its listener is gone.
const CLOSE_POLL: Duration = Duration::from_millis(250);

/// Creates [`CommandBundler`]s for a located bundler program.
#[derive(Debug, Clone)]
pub struct CommandBundlerFactory {
    program: PathBuf,
    working_dir: PathBuf,
    name: String,
}

impl CommandBundlerFactory {
    /// Locates `command` on PATH and binds builds to `working_dir`.
    ///
    /// # Errors
    ///
    /// [`crate::bundler::Error::ToolNotFound`] when the program is missing.
    pub fn locate(command: &str, working_dir: impl Into<PathBuf>) -> BundlerResult<Self> {
        let program = locate_tool(command)?;
        Ok(Self::with_program(program, working_dir))
    }

    /// Uses `program` as-is, without a PATH lookup.
    pub fn with_program(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let name = program
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.display().to_string());
        Self {
            program,
            working_dir: working_dir.into(),
            name,
        }
    }
}

impl BundlerFactory for CommandBundlerFactory {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, entry: &str, options: &BundleOptions) -> Box<dyn EntryBundler> {
        Box::new(CommandBundler {
            program: self.program.clone(),
            working_dir: self.working_dir.clone(),
            entry: entry.to_string(),
            options: options.clone(),
            rebuilds: None,
        })
    }
}

/// One external bundler invocation bound to an entry.
#[derive(Debug)]
pub struct CommandBundler {
    program: PathBuf,
    working_dir: PathBuf,
    entry: String,
    options: BundleOptions,
    rebuilds: Option<RebuildReceiver>,
}

impl CommandBundler {
    /// Command-line arguments for one build.
    pub fn build_args(entry: &str, options: &BundleOptions) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            entry.to_string(),
            "--out-dir".to_string(),
            options.out_dir.display().to_string(),
            "--target".to_string(),
            options.target.clone(),
        ];
        if !options.cache {
            args.push("--no-cache".to_string());
        }

        for (key, value) in &options.extra {
            match value {
                Value::Null => {}
                Value::Bool(true) => args.push(format!("--{key}")),
                Value::Bool(false) => args.push(format!("--no-{key}")),
                Value::String(s) => args.extend([format!("--{key}"), s.clone()]),
                Value::Array(items) => {
                    for item in items {
                        args.push(format!("--{key}"));
                        args.push(match item {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        });
                    }
                }
                other => args.extend([format!("--{key}"), other.to_string()]),
            }
        }
        args
    }

    /// Module the bundler emits for `entry`: `<out_dir>/<stem>.js`.
    pub fn module_path(entry: &str, out_dir: &Path) -> PathBuf {
        let file_name = Path::new(entry)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = file_name
            .strip_suffix(SOURCE_EXTENSION_PATTERN)
            .unwrap_or(&file_name);
        out_dir.join(format!("{stem}.js"))
    }

    fn watch_dir(&self) -> PathBuf {
        match Path::new(&self.entry).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.working_dir.join(parent),
            _ => self.working_dir.clone(),
        }
    }

    fn spawn_watcher(&self, tx: RebuildSender) -> Result<()> {
        let watch_dir = self.watch_dir();
        let program = self.program.clone();
        let working_dir = self.working_dir.clone();
        let entry = self.entry.clone();
        let args = Self::build_args(&self.entry, &self.options.with_watch(false));
        let out_dir = self.working_dir.join(&self.options.out_dir);

        let (fs_tx, fs_rx) = channel();
        let mut debouncer =
            new_debouncer(WATCH_DEBOUNCE, fs_tx).context("failed to initialize file watcher")?;
        debouncer
            .watcher()
            .watch(&watch_dir, RecursiveMode::Recursive)
            .with_context(|| format!("failed to watch {}", watch_dir.display()))?;

        log::info!("Watching {} for changes", watch_dir.display());

        std::thread::spawn(move || {
            // The debouncer stops watching when dropped, so it lives here.
            let _debouncer = debouncer;

            loop {
                let result = match fs_rx.recv_timeout(CLOSE_POLL) {
                    Ok(result) => result,
                    Err(RecvTimeoutError::Timeout) if tx.is_closed() => break,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                };
                let events = match result {
                    Ok(events) => events,
                    Err(e) => {
                        log::warn!("Watch error: {e}");
                        continue;
                    }
                };

                let changed = events.iter().any(|e| {
                    matches!(e.kind, DebouncedEventKind::Any) && !e.path.starts_with(&out_dir)
                });
                if !changed {
                    continue;
                }
                // Closed once the watch is torn down
                if tx.is_closed() {
                    break;
                }

                match std::process::Command::new(&program)
                    .args(&args)
                    .current_dir(&working_dir)
                    .output()
                {
                    Ok(output) if output.status.success() => {
                        log::debug!("Rebuilt {entry}");
                        if tx.send(RebuildEvent::now(entry.clone())).is_err() {
                            break;
                        }
                    }
                    Ok(output) => log::error!(
                        "Rebuild of {entry} failed ({}): {}",
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    ),
                    Err(e) => log::error!("Failed to run {}: {e}", program.display()),
                }
            }
            log::debug!("Stopped watching {}", watch_dir.display());
        });

        Ok(())
    }
}

#[async_trait]
impl EntryBundler for CommandBundler {
    async fn bundle(&mut self) -> Result<BundleHandle> {
        let args = Self::build_args(&self.entry, &self.options.with_watch(false));
        log::debug!("Running {} {}", self.program.display(), args.join(" "));

        let output = tokio::process::Command::new(&self.program)
            .args(&args)
            .current_dir(&self.working_dir)
            .output()
            .await
            .with_context(|| format!("failed to run {}", self.program.display()))?;

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        if self.options.watch {
            let (tx, rx) = mpsc::unbounded_channel();
            self.spawn_watcher(tx)?;
            self.rebuilds = Some(rx);
        }

        Ok(BundleHandle::new(
            self.entry.clone(),
            Self::module_path(&self.entry, &self.options.out_dir),
        ))
    }

    fn rebuilds(&mut self) -> Option<RebuildReceiver> {
        self.rebuilds.take()
    }
}
