//! Host adapter that runs shell commands for the pipeline's own steps.

use crate::bundler::PipelineHost;
use crate::error::{CliError, Result};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Runs `command` through the platform shell in `working_dir`.
pub async fn run_shell<K, V>(command: &str, working_dir: &Path, envs: &[(K, V)]) -> Result<()>
where
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = if cfg!(windows) {
        let mut cmd = tokio::process::Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    } else {
        let mut cmd = tokio::process::Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    };
    for (key, value) in envs {
        cmd.env(key, value);
    }

    log::debug!("Running `{}` in {}", command, working_dir.display());
    let status = cmd.current_dir(working_dir).status().await?;

    if !status.success() {
        return Err(CliError::ExecutionFailed {
            command: command.to_string(),
            reason: format!("exited with {status}"),
        }
        .into());
    }
    Ok(())
}

/// [`PipelineHost`] backed by an optional invocation command.
///
/// Every invocation starts a fresh process, so module invalidation only
/// records the latest path, exposed to the command as `FUNCTION_MODULE`.
#[derive(Debug)]
pub struct ProcessHost {
    invoke_cmd: Option<String>,
    working_dir: PathBuf,
    last_invalidated: Mutex<Option<PathBuf>>,
}

impl ProcessHost {
    pub fn new(invoke_cmd: Option<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            invoke_cmd,
            working_dir: working_dir.into(),
            last_invalidated: Mutex::new(None),
        }
    }

    /// Most recently invalidated module.
    pub fn last_invalidated(&self) -> Option<PathBuf> {
        self.last_invalidated
            .lock()
            .ok()
            .and_then(|path| path.clone())
    }
}

#[async_trait]
impl PipelineHost for ProcessHost {
    async fn invoke_local(&self) -> anyhow::Result<()> {
        let Some(command) = &self.invoke_cmd else {
            log::info!("No invoke command configured, skipping local invocation");
            return Ok(());
        };

        let module = self.last_invalidated();
        let mut envs = Vec::new();
        if let Some(module) = &module {
            envs.push(("FUNCTION_MODULE", module.as_os_str()));
        }
        run_shell(command, &self.working_dir, &envs).await?;
        Ok(())
    }

    fn invalidate_module(&self, resolved_path: &Path) {
        log::debug!("Invalidating cached module {}", resolved_path.display());
        if let Ok(mut last) = self.last_invalidated.lock() {
            *last = Some(resolved_path.to_path_buf());
        }
    }
}
