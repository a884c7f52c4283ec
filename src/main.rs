//! Kodegen Bundler Serverless - bundle orchestration for serverless packaging.
//!
//! This binary bundles function handlers, runs the packaging step against the
//! build output, and relocates the packaged artifacts.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match kodegen_bundler_serverless::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_hard_stop() {
                eprintln!("The service path may still point at the build folder; do not deploy.");
            }
            1
        }
    };

    process::exit(exit_code);
}
