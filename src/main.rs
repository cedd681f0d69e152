use std::process::ExitCode;

use anyhow::Context;
use clap::Parser; // for cli
use redlama::{Args, cli, metrics, state};
use tracing_subscriber::EnvFilter;

// this is main async function with tokio
#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // logs go to stderr, stdout only carries the response
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let code = match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    };

    if args.metrics {
        eprint!("{}", metrics::render());
    }
    code
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    cli::write_hint(args, &mut stdout)?;

    let dispatcher = state::start(&args.config())
        .await
        .context("startup check failed")?;

    cli::respond(args, &dispatcher, &mut stdout).await
}
