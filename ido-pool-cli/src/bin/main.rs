//! ido-pool: client for the IDO pool program and its multisig authority.
//!
//! Usage:
//!   ido-pool --program-id <ID> inspect <POOL_ACCOUNT>
//!   ido-pool --program-id <ID> bid <POOL> <USDC_ACCOUNT> <AMOUNT> <REDEEMABLE_ACCOUNT>
//!   ido-pool --program-id <ID> multisig-modify-pool-time <POOL> <START> <END_DEPOSITS> <END_IDO> <WITHDRAW> --dry-run
//!   ido-pool idl [ido-pool|multisig] [INSTRUCTION]

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ido_pool_cli::cli::Opt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();
    init_logging(opt.global.verbose);
    info!(command = ?std::env::args().skip(1).collect::<Vec<_>>(), "ido-pool");

    ido_pool_cli::run(opt).await?;
    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` raises the default level.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
