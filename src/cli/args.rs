//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with the host
//! commands this binary emulates around the bundle stages.

use crate::bundler::RunOptions;
use crate::metadata::SERVICE_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bundle serverless functions before packaging and relocate the artifacts
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_serverless",
    version,
    about = "Bundle serverless functions before packaging",
    long_about = "Compiles function handlers with an external bundler into a temporary build folder,
runs the packaging command against that folder, then copies the packaged output back
into <service>/.serverless and reports the rewritten artifact paths.

Usage:
  kodegen_bundler_serverless package --package-cmd 'zip -r .serverless/app.zip .'
  kodegen_bundler_serverless deploy-function -f hello --package-cmd ./package.sh
  kodegen_bundler_serverless invoke -f hello --watch --invoke-cmd 'node run.js'"
)]
pub struct Args {
    /// Service definition file
    #[arg(short, long, value_name = "FILE", default_value = SERVICE_FILE, env = "SERVICE_CONFIG")]
    pub config: PathBuf,

    /// Bundler program (overrides `custom.bundle.command`)
    #[arg(short, long, value_name = "PROGRAM")]
    pub bundler: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Host command to emulate.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bundle every function, package, and relocate the artifacts
    Package {
        /// Packaging command, run inside the build folder
        #[arg(long, value_name = "CMD")]
        package_cmd: Option<String>,
    },

    /// Bundle and package a single function
    DeployFunction {
        /// Function to package
        #[arg(short, long)]
        function: String,

        /// Packaging command, run inside the build folder
        #[arg(long, value_name = "CMD")]
        package_cmd: Option<String>,
    },

    /// Bundle a function and invoke it locally
    Invoke {
        /// Function to invoke
        #[arg(short, long)]
        function: String,

        /// Rebuild and re-invoke on source changes until interrupted
        #[arg(short, long)]
        watch: bool,

        /// Invocation command, run from the service directory
        #[arg(long, value_name = "CMD")]
        invoke_cmd: Option<String>,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.config.as_os_str().is_empty() {
            return Err("Config path cannot be empty".to_string());
        }

        if self
            .bundler
            .as_deref()
            .is_some_and(|bundler| bundler.trim().is_empty())
        {
            return Err("Bundler program cannot be empty".to_string());
        }

        match &self.command {
            Command::DeployFunction { function, .. } | Command::Invoke { function, .. }
                if function.trim().is_empty() =>
            {
                Err("Function name cannot be empty".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Run-time options for the bundle stages.
    pub fn run_options(&self) -> RunOptions {
        match &self.command {
            Command::Package { .. } => RunOptions::default(),
            Command::DeployFunction { function, .. } => RunOptions {
                function: Some(function.clone()),
                watch: false,
            },
            Command::Invoke {
                function, watch, ..
            } => RunOptions {
                function: Some(function.clone()),
                watch: *watch,
            },
        }
    }
}
