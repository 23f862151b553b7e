mod args;
mod client;
mod mounter;

use args::ArgParser;
use client::JobApiService;
use mounter::HelperMounter;

use clap::Parser;
use shimlib::{JobCoordinator, ServiceError, ShimError};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = ArgParser::parse();
    tracing::info!(job_id = %args.job_id, addr = %args.addr, "starting job shim");
    process::exit(run(args).await);
}

/// The shim's exit code reflects its own infrastructure health, never the
/// user job's outcome: that travels exclusively in the completion report.
async fn run(args: ArgParser) -> i32 {
    let service = match JobApiService::connect(&args.addr).await {
        Ok(service) => Arc::new(service),
        Err(err) => {
            eprintln!("{}", err);
            return 1;
        }
    };
    let mounter = Arc::new(HelperMounter::new(&args.mount_helper));
    let coordinator = JobCoordinator::with_mount_path(service, mounter, &args.mount_path);

    match coordinator.run(&args.job_id).await {
        Ok(()) => 0,
        // the service answered but would not hand out the job; nothing to do
        Err(ShimError::Fetch(ServiceError::Rejected(reason))) => {
            eprintln!("{}", reason);
            0
        }
        Err(err) => {
            eprintln!("{}", err);
            1
        }
    }
}
