use std::sync::Arc;

use clap::Parser;
use lab_buddy::{Config, LabAssistant, args::Args, config, logger, server, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.log_level);

    let config = match &args.config {
        Some(path) => config::load(path).await?,
        None => Config::default(),
    };
    tracing::debug!(?config, "configuration loaded");

    let assistant = Arc::new(LabAssistant::new(&config));
    let mut server = server::run_server(assistant.clone(), args.addr()?).await?;

    tokio::select! {
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            assistant.shutdown();
            server.abort();
        }
        res = &mut server => {
            if let Err(e) = res {
                tracing::error!(?e, "server task failed");
            }
            assistant.shutdown();
        }
    }
    Ok(())
}
