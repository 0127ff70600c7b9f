mod cli;

use crate::cli::DevProxyArguments;
use anyhow::Result;
use clap::Parser;
use devproxy::config::ConfigFile;
use devproxy::proxy;
use log::{LevelFilter, info, trace};

#[tokio::main]
async fn main() -> Result<()> {
    let args = DevProxyArguments::parse();
    pretty_env_logger::env_logger::builder()
        .format_timestamp(None)
        .filter_level(if args.verbose { LevelFilter::Trace } else { LevelFilter::Info })
        .init();

    // Handle command line arguments
    args.handle_arguments().await?;

    info!("Starting devproxy");
    trace!("Arguments: {:#?}", args);

    let effective_config_path = args.effective_config_path();
    let config = ConfigFile::try_load(&effective_config_path).await?;
    let routes = config.load_routes(&ConfigFile::base_dir(&effective_config_path))?;

    tokio::select! {
        result = proxy::start_all(routes) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }

    Ok(())
}
