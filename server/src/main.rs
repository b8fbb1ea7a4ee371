mod config;
mod suggestion_service;

use std::path::PathBuf;

use clap::Parser;
use tonic::transport::Server;
use uttt_common::proto::move_suggestion_server::MoveSuggestionServer;
use uttt_common::{log, logger};

use suggestion_service::MoveSuggestionService;

#[derive(Parser)]
#[command(name = "uttt_server")]
struct Args {
    #[arg(long, default_value = "uttt_server_config.yaml")]
    config: PathBuf,

    /// Overrides the listen address from the config file.
    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Server".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let mut config = config::get_config_manager(&args.config).get_config()?;
    if let Some(address) = args.address {
        config.address = address;
    }
    let addr = config.socket_addr()?;

    log!(
        "Move suggestion server listening on {} (default budget {} ms, max {} ms)",
        addr,
        config.search.time_budget_ms,
        config.max_time_budget_ms
    );

    let service = MoveSuggestionService::new(config);

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        log!("Shutdown signal received");
    };

    Server::builder()
        .add_service(MoveSuggestionServer::new(service))
        .serve_with_shutdown(addr, shutdown_signal)
        .await?;

    log!("Server shut down gracefully");

    Ok(())
}
