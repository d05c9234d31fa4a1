mod demo;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use thaw_client::{Session, SessionConfig, DEFAULT_BASE_URL};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "thaw-demo")]
#[command(author, version, about = "Run the Thaw REST API demonstration sequence", long_about = None)]
struct Args {
    /// Base URL of the Thaw server
    #[arg(short, long, default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Accept invalid or self-signed TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log level used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&args.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = SessionConfig::new(&args.url)
        .accept_invalid_certs(args.insecure)
        .timeout(args.timeout_secs.map(Duration::from_secs));
    let session = Session::connect(&config);

    let stdout = std::io::stdout();
    demo::run(&session, &mut stdout.lock())
}
