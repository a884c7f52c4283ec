//! Command line interface for the serverless bundler.
//!
//! The binary plays the host pipeline: it loads the service definition,
//! fires the lifecycle events around its own packaging or invocation step,
//! and prints the relocation report.

mod args;
mod host;

pub use args::{Args, Command};
pub use host::{ProcessHost, run_shell};

use crate::bundler::{
    BuildState, CommandBundlerFactory, LifecycleEvent, PipelineHost, RelocationReport, Stages,
};
use crate::error::{CliError, Result};
use crate::metadata::load_service;
use crate::service::Service;
use std::sync::Arc;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(args).await
}

/// Runs already-parsed arguments.
pub async fn execute(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let mut service = load_service(&args.config)?;
    let working_dir = service.service_path.clone();

    let program = match &args.bundler {
        Some(program) => program.clone(),
        None => service.bundle_settings().command().to_string(),
    };
    let factory = Arc::new(CommandBundlerFactory::locate(&program, &working_dir)?);

    let invoke_cmd = match &args.command {
        Command::Invoke { invoke_cmd, .. } => invoke_cmd.clone(),
        _ => None,
    };
    let host = Arc::new(ProcessHost::new(invoke_cmd, &working_dir));

    let stages = Stages::new(factory, host.clone(), args.run_options());
    let mut state = BuildState::new();

    match &args.command {
        Command::Package { package_cmd } => {
            let report = package(
                &stages,
                &mut state,
                &mut service,
                package_cmd.as_deref(),
                (
                    LifecycleEvent::BeforePackageCreateArtifacts,
                    LifecycleEvent::AfterPackageCreateArtifacts,
                ),
            )
            .await?;
            print_report(report.as_ref())?;
        }
        Command::DeployFunction { package_cmd, .. } => {
            let report = package(
                &stages,
                &mut state,
                &mut service,
                package_cmd.as_deref(),
                (
                    LifecycleEvent::BeforeDeployFunctionPackage,
                    LifecycleEvent::AfterDeployFunctionPackage,
                ),
            )
            .await?;
            print_report(report.as_ref())?;
        }
        Command::Invoke { .. } => {
            stages
                .dispatch(LifecycleEvent::BeforeInvokeLocal, &mut state, &mut service)
                .await?;
            host.invoke_local().await?;
            stages
                .dispatch(LifecycleEvent::AfterInvokeLocal, &mut state, &mut service)
                .await?;

            if state.is_watching() {
                tokio::signal::ctrl_c().await?;
                log::info!(
                    "Stopped watching after {} rebuild(s)",
                    state.watch().rebuild_count()
                );
            }
        }
    }

    Ok(0)
}

/// Build, run the host's packaging command in the build folder, clean up.
async fn package(
    stages: &Stages,
    state: &mut BuildState,
    service: &mut Service,
    package_cmd: Option<&str>,
    (before, after): (LifecycleEvent, LifecycleEvent),
) -> Result<Option<RelocationReport>> {
    stages.dispatch(before, state, service).await?;

    if let Some(command) = package_cmd {
        let build_path = service.service_path.clone();
        tokio::fs::create_dir_all(&build_path).await?;
        run_shell(command, &build_path, &[("SERVICE_PATH", build_path.as_os_str())]).await?;
    }

    Ok(stages.dispatch(after, state, service).await?)
}

#[allow(clippy::print_stdout)]
fn print_report(report: Option<&RelocationReport>) -> Result<()> {
    if let Some(report) = report {
        println!("{}", serde_json::to_string_pretty(report)?);
    }
    Ok(())
}
